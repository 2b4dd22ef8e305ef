//! Run store module for persisting crawl state
//!
//! This module provides the key/value store that carries a crawl run across
//! process restarts, including:
//! - The `RunStore` trait the orchestrator writes through
//! - A SQLite-backed store for real runs
//! - An in-memory store for unit tests and one-shot extraction
//!
//! Writes to a single key are atomic. Multi-key updates are deliberately
//! ordered by the caller rather than wrapped in a transaction, so a crash
//! between writes leaves a state the orchestrator knows how to heal.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{RunStore, StoreError, StoreResult};

use crate::SieveError;

use std::path::Path;

/// Initializes or opens the on-disk run store
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `retention` - Entries older than this are dropped on open; `None` keeps everything
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized store
/// * `Err(SieveError)` - Failed to initialize store
pub fn open_store(path: &Path, retention: Option<chrono::Duration>) -> Result<SqliteStore, SieveError> {
    Ok(SqliteStore::open(path, retention)?)
}
