//! Crawler module for documentation page fetching and processing
//!
//! This module contains the crawl-to-graph pipeline, including:
//! - HTTP fetching with status classification
//! - Page extraction (title, body markdown, previous/next links)
//! - Batched concurrent crawling and graph linking

mod builder;
mod extractor;
mod fetcher;
mod markdown;

pub use builder::{GraphBuilder, BATCH_SIZE};
pub use extractor::{extract_page, parse_page, ExtractedPage, UNTITLED};
pub use fetcher::{build_http_client, fetch_text, user_agent_string};
pub use markdown::{html_to_markdown, strip_permalink_markers};
