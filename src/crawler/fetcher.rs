//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made while building a snapshot:
//! - Building HTTP clients with proper user agent strings
//! - Status-checked GET requests returning the response body
//! - Error classification into fetch (non-success status) and transport failures

use crate::config::UserAgentConfig;
use crate::DocGraphError;
use reqwest::Client;
use std::time::Duration;

/// Formats the user agent string: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use docgraph::config::UserAgentConfig;
/// use docgraph::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "docgraph".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status | `DocGraphError::Fetch` with status and reason phrase |
/// | DNS, connect, timeout, body read | `DocGraphError::Transport` |
///
/// No retries are attempted.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, DocGraphError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| DocGraphError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocGraphError::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    response
        .text()
        .await
        .map_err(|source| DocGraphError::Transport {
            url: url.to_string(),
            source,
        })
}
