use serde::Deserialize;

/// Default staleness threshold in days
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;

/// Main configuration structure for docgraph
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub cache: CacheConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Documentation site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Location of the sitemap listing every page
    #[serde(rename = "sitemap-url")]
    pub sitemap_url: String,

    /// Documentation release to snapshot (e.g. "5.1")
    pub version: String,
}

/// Snapshot cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Prefix for snapshot keys
    pub namespace: String,

    /// Snapshots older than this are rebuilt
    #[serde(rename = "max-age-days", default = "default_max_age_days")]
    pub max_age_days: u32,
}

impl CacheConfig {
    /// The staleness threshold as a duration
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.max_age_days))
    }
}

fn default_max_age_days() -> u32 {
    DEFAULT_MAX_AGE_DAYS
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}
