//! Storage traits and error types
//!
//! This module defines the trait interface for key-value storage backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string values
///
/// Writes replace the whole value for a key. There are no transactions and no
/// ordering guarantee between a write and a concurrent read of the same key.
pub trait KeyValueStore {
    /// Gets the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`, returning whether a value was present
    fn remove(&mut self, key: &str) -> StorageResult<bool>;

    /// Lists every stored key in ascending order
    fn keys(&self) -> StorageResult<Vec<String>>;
}
