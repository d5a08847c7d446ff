//! Snapshot cache
//!
//! Persists a document graph per documentation version as one JSON bundle:
//!
//! ```text
//! key:   "<namespace>-<version>"
//! value: { "entries": [FlatRecord, ...], "lastRefresh": <ms since epoch> }
//! ```
//!
//! Bundles are written whole and read whole. A value that does not parse as a
//! bundle is treated exactly like a missing one.

mod refresh;

pub use refresh::{load_or_refresh, refresh, GraphSource, LoadedGraph};

use crate::graph::{from_flat_records, to_flat_records, DocumentGraph, FlatRecord};
use crate::storage::KeyValueStore;
use crate::DocGraphError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default staleness threshold: 7 days in milliseconds
pub const DEFAULT_MAX_AGE_MS: i64 = 604_800_000;

/// Default staleness threshold as a duration
pub fn default_max_age() -> Duration {
    Duration::milliseconds(DEFAULT_MAX_AGE_MS)
}

/// The persisted unit for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub entries: Vec<FlatRecord>,
    /// Milliseconds since the Unix epoch
    pub last_refresh: i64,
}

impl Snapshot {
    /// Milliseconds elapsed between the refresh and `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.last_refresh
    }

    /// A snapshot is stale once its age exceeds `max_age`
    pub fn is_stale_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) > max_age.num_milliseconds()
    }

    pub fn last_refresh_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_refresh)
    }
}

/// Summary of one version's cache entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub key: String,
    pub last_refresh: Option<DateTime<Utc>>,
    pub age_ms: Option<i64>,
    pub stale: bool,
    pub entries: usize,
}

/// Version-keyed snapshot storage over a [`KeyValueStore`]
///
/// Construct one per process and pass it by reference. Callers must not run
/// two writers for the same version at once.
#[derive(Debug)]
pub struct SnapshotCache<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> SnapshotCache<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// The store key for `version`
    pub fn key(&self, version: &str) -> String {
        format!("{}-{}", self.namespace, version)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stores `graph` for `version`, stamped with the current time
    pub fn write(&mut self, version: &str, graph: &DocumentGraph) -> Result<(), DocGraphError> {
        self.write_at(version, graph, Utc::now())
    }

    /// Stores `graph` for `version`, stamped with `refreshed_at`
    ///
    /// Any previous bundle for the version is overwritten.
    pub fn write_at(
        &mut self,
        version: &str,
        graph: &DocumentGraph,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), DocGraphError> {
        let snapshot = Snapshot {
            entries: to_flat_records(graph),
            last_refresh: refreshed_at.timestamp_millis(),
        };
        let value = serde_json::to_string(&snapshot)?;
        let key = self.key(version);

        self.store.set(&key, &value)?;

        tracing::info!(
            "Wrote snapshot {} ({} entries, {} bytes)",
            key,
            snapshot.entries.len(),
            value.len()
        );
        Ok(())
    }

    /// Loads the raw bundle for `version`
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored value is not a
    /// valid bundle. Store failures are still errors.
    pub fn snapshot(&self, version: &str) -> Result<Option<Snapshot>, DocGraphError> {
        let key = self.key(version);
        let Some(value) = self.store.get(&key)? else {
            tracing::debug!("No snapshot stored under {}", key);
            return Ok(None);
        };

        match serde_json::from_str::<Snapshot>(&value) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!("Ignoring malformed snapshot {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Loads and relinks the graph for `version`
    pub fn read(&self, version: &str) -> Result<Option<DocumentGraph>, DocGraphError> {
        Ok(self
            .snapshot(version)?
            .map(|snapshot| from_flat_records(snapshot.entries)))
    }

    /// Milliseconds since the last refresh, or None without a valid bundle
    pub fn age(&self, version: &str) -> Result<Option<i64>, DocGraphError> {
        self.age_at(version, Utc::now())
    }

    pub fn age_at(&self, version: &str, now: DateTime<Utc>) -> Result<Option<i64>, DocGraphError> {
        Ok(self.snapshot(version)?.map(|snapshot| snapshot.age_at(now)))
    }

    /// True without a valid bundle or once its age exceeds `max_age`
    pub fn is_stale(&self, version: &str, max_age: Duration) -> Result<bool, DocGraphError> {
        self.is_stale_at(version, max_age, Utc::now())
    }

    pub fn is_stale_at(
        &self,
        version: &str,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, DocGraphError> {
        Ok(self
            .snapshot(version)?
            .map_or(true, |snapshot| snapshot.is_stale_at(max_age, now)))
    }

    /// When the bundle for `version` was written
    pub fn last_refresh_time(&self, version: &str) -> Result<Option<DateTime<Utc>>, DocGraphError> {
        Ok(self
            .snapshot(version)?
            .and_then(|snapshot| snapshot.last_refresh_time()))
    }

    /// Collects refresh time, age, staleness and entry count for `version`
    pub fn status(&self, version: &str, max_age: Duration) -> Result<CacheStatus, DocGraphError> {
        let now = Utc::now();
        let snapshot = self.snapshot(version)?;

        Ok(CacheStatus {
            key: self.key(version),
            last_refresh: snapshot.as_ref().and_then(Snapshot::last_refresh_time),
            age_ms: snapshot.as_ref().map(|s| s.age_at(now)),
            stale: snapshot
                .as_ref()
                .map_or(true, |s| s.is_stale_at(max_age, now)),
            entries: snapshot.as_ref().map_or(0, |s| s.entries.len()),
        })
    }
}
