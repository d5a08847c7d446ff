use crate::config::types::{CacheConfig, Config, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_cache_config(&config.cache)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the documentation site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.sitemap_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "sitemap-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    validate_version(&config.version)
}

/// Validates a documentation version string
///
/// The version becomes a path segment and part of the cache key, so it may
/// not be empty or contain slashes or whitespace.
pub fn validate_version(version: &str) -> Result<(), ConfigError> {
    if version.is_empty() {
        return Err(ConfigError::Validation("version cannot be empty".to_string()));
    }

    if version.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Err(ConfigError::Validation(format!(
            "version must not contain '/' or whitespace, got '{}'",
            version
        )));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.namespace.is_empty() {
        return Err(ConfigError::Validation(
            "namespace cannot be empty".to_string(),
        ));
    }

    if config.max_age_days < 1 {
        return Err(ConfigError::Validation(format!(
            "max-age-days must be >= 1, got {}",
            config.max_age_days
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
