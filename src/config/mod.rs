//! Configuration module for docgraph
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docgraph::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docgraph.toml")).unwrap();
//! println!("Snapshotting version {}", config.site.version);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{CacheConfig, Config, SiteConfig, UserAgentConfig, DEFAULT_MAX_AGE_DAYS};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate_version;
