//! docgraph: a locally cached, cross-linked snapshot of versioned documentation
//!
//! This crate crawls a documentation sitemap, keeps the "topics" and "ref" pages
//! of one release, converts each page to markdown, links the pages into a
//! parent/previous/next graph and persists that graph to a key-value cache with
//! staleness tracking.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod graph;
pub mod sections;
pub mod sitemap;
pub mod storage;

use thiserror::Error;

/// Main error type for docgraph operations
#[derive(Debug, Error)]
pub enum DocGraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {status} {reason}")]
    Fetch {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTML processing error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocGraphError {
    /// HTTP status carried by a [`DocGraphError::Fetch`], if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for docgraph operations
pub type Result<T> = std::result::Result<T, DocGraphError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{load_or_refresh, SnapshotCache};
pub use config::Config;
pub use crawler::GraphBuilder;
pub use graph::{DocId, Document, DocumentGraph, FlatRecord};
pub use sections::{filter_by_version, patterns_for, section_parent_url};
