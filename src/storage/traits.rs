//! Run store trait and error types
//!
//! This module defines the trait interface for run store backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for run store backends
///
/// A run store maps string keys to string values. Getting or removing a key
/// that was never set is not an error. Implementations must make each single
/// write durable on return; callers sequence multi-key updates themselves.
pub trait RunStore {
    /// Gets the value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Sets `key` to `value`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key` if present
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}
