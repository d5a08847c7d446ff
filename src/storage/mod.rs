//! Storage module for persisting snapshots
//!
//! This module provides the string-keyed store the snapshot cache writes to:
//! - A `KeyValueStore` trait with whole-value get/set semantics
//! - A SQLite backend for on-disk persistence
//! - An in-memory backend for tests and embedding

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use schema::{initialize_schema, schema_version, SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};

use std::path::Path;

/// Opens or creates the snapshot database at `path`
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}
