//! SQLite run store implementation
//!
//! This module provides a SQLite-based implementation of the RunStore trait.
//! All run state lives in a single key/value table; each row remembers when
//! it was last written so stale runs can be expired on open.

use crate::storage::traits::{RunStore, StoreResult};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQL schema for the run store
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS run_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// SQLite run store backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `retention` - Entries last written before this window are dropped on open
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created store
    /// * `Err(StoreError)` - Failed to open store
    pub fn open(path: &Path, retention: Option<Duration>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        conn.execute_batch(SCHEMA_SQL)?;

        let store = Self { conn };
        if let Some(window) = retention {
            store.sweep_stale(window)?;
        }

        Ok(store)
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Removes entries last written before the retention window
    ///
    /// Rows whose timestamp fails to parse count as stale.
    fn sweep_stale(&self, window: Duration) -> StoreResult<()> {
        let cutoff = Utc::now() - window;

        let mut stmt = self
            .conn
            .prepare("SELECT key, updated_at FROM run_state")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut stale = Vec::new();
        for row in rows {
            let (key, updated_at) = row?;
            match DateTime::parse_from_rfc3339(&updated_at) {
                Ok(ts) if ts.with_timezone(&Utc) >= cutoff => {}
                _ => stale.push(key),
            }
        }
        drop(stmt);

        for key in &stale {
            self.conn
                .execute("DELETE FROM run_state WHERE key = ?1", params![key])?;
        }
        if !stale.is_empty() {
            tracing::info!("Expired {} stale run state entries", stale.len());
        }

        Ok(())
    }
}

impl RunStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM run_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO run_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM run_state WHERE key = ?1", params![key])?;

        Ok(())
    }
}
