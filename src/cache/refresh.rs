use crate::cache::SnapshotCache;
use crate::crawler::GraphBuilder;
use crate::graph::DocumentGraph;
use crate::storage::KeyValueStore;
use crate::DocGraphError;
use chrono::{Duration, Utc};

/// Where a loaded graph came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSource {
    /// A fresh snapshot was already cached
    Cache,
    /// The site was crawled and the snapshot rewritten
    Crawl,
}

/// A graph together with its origin
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: DocumentGraph,
    pub source: GraphSource,
}

/// Crawls `version` and overwrites its snapshot
///
/// A failed crawl leaves the stored snapshot untouched.
pub async fn refresh<S: KeyValueStore>(
    cache: &mut SnapshotCache<S>,
    builder: &GraphBuilder,
    version: &str,
) -> Result<DocumentGraph, DocGraphError> {
    let graph = builder.build_graph(version).await?;
    cache.write(version, &graph)?;
    Ok(graph)
}

/// Returns the cached graph for `version` unless it is missing, stale or
/// `force` is set, in which case the site is crawled and the cache rewritten
pub async fn load_or_refresh<S: KeyValueStore>(
    cache: &mut SnapshotCache<S>,
    builder: &GraphBuilder,
    version: &str,
    max_age: Duration,
    force: bool,
) -> Result<LoadedGraph, DocGraphError> {
    if !force {
        if let Some(snapshot) = cache.snapshot(version)? {
            if !snapshot.is_stale_at(max_age, Utc::now()) {
                tracing::info!(
                    "Using cached snapshot for version {} ({} entries)",
                    version,
                    snapshot.entries.len()
                );
                return Ok(LoadedGraph {
                    graph: DocumentGraph::from_records(snapshot.entries),
                    source: GraphSource::Cache,
                });
            }
            tracing::info!("Cached snapshot for version {} is stale", version);
        }
    }

    let graph = refresh(cache, builder, version).await?;
    Ok(LoadedGraph {
        graph,
        source: GraphSource::Crawl,
    })
}
