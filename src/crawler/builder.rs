//! Graph builder - crawl orchestration
//!
//! Reads the sitemap, keeps the in-scope pages for one documentation version,
//! fetches them in fixed-size concurrent batches and links the results into a
//! [`DocumentGraph`].

use crate::config::Config;
use crate::crawler::extractor::{extract_page, ExtractedPage};
use crate::crawler::fetcher::build_http_client;
use crate::graph::{DocumentGraph, FlatRecord};
use crate::sections::{filter_by_version, section_parent_url};
use crate::sitemap::read_sitemap;
use crate::DocGraphError;
use futures::future::try_join_all;
use reqwest::Client;

/// Number of pages fetched concurrently per batch
pub const BATCH_SIZE: usize = 10;

/// Builds document graphs from a documentation sitemap
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    client: Client,
    sitemap_url: String,
}

impl GraphBuilder {
    /// Creates a builder reading `sitemap_url` with `client`
    pub fn new(client: Client, sitemap_url: impl Into<String>) -> Self {
        Self {
            client,
            sitemap_url: sitemap_url.into(),
        }
    }

    /// Creates a builder from the site and user agent configuration
    pub fn from_config(config: &Config) -> Result<Self, DocGraphError> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(client, config.site.sitemap_url.clone()))
    }

    /// The sitemap this builder reads
    pub fn sitemap_url(&self) -> &str {
        &self.sitemap_url
    }

    /// Lists the sitemap URLs that would be crawled for `version`
    pub async fn in_scope_urls(&self, version: &str) -> Result<Vec<String>, DocGraphError> {
        let urls = read_sitemap(&self.client, &self.sitemap_url).await?;
        let in_scope = filter_by_version(&urls, version);

        tracing::info!(
            "Sitemap lists {} URLs, {} in scope for version {}",
            urls.len(),
            in_scope.len(),
            version
        );

        Ok(in_scope)
    }

    /// Crawls every in-scope page for `version` and links them into a graph
    ///
    /// Document order matches the filtered sitemap order. Any failed fetch
    /// aborts the whole build; nothing partial is returned.
    pub async fn build_graph(&self, version: &str) -> Result<DocumentGraph, DocGraphError> {
        let start_time = std::time::Instant::now();

        let urls = self.in_scope_urls(version).await?;
        let pages = self.fetch_pages(&urls).await?;

        let records = urls
            .into_iter()
            .zip(pages)
            .map(|(url, page)| FlatRecord {
                parent_url: section_parent_url(&url),
                previous_url: page.previous_url,
                next_url: page.next_url,
                title: page.title,
                content: page.content,
                url,
            })
            .collect();

        let graph = DocumentGraph::from_records(records);

        tracing::info!(
            "Built graph for version {}: {} documents in {:?}",
            version,
            graph.len(),
            start_time.elapsed()
        );

        Ok(graph)
    }

    /// Fetches `urls` in batches of [`BATCH_SIZE`], preserving input order
    async fn fetch_pages(&self, urls: &[String]) -> Result<Vec<ExtractedPage>, DocGraphError> {
        let mut pages = Vec::with_capacity(urls.len());
        let batch_count = urls.len().div_ceil(BATCH_SIZE);

        for (batch_index, batch) in urls.chunks(BATCH_SIZE).enumerate() {
            tracing::debug!(
                "Fetching batch {}/{} ({} pages)",
                batch_index + 1,
                batch_count,
                batch.len()
            );

            let fetched = try_join_all(batch.iter().map(|url| extract_page(&self.client, url)))
                .await
                .map_err(|e| {
                    tracing::error!("Batch {} failed: {}", batch_index + 1, e);
                    e
                })?;

            pages.extend(fetched);
        }

        Ok(pages)
    }
}
