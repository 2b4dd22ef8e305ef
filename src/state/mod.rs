//! State module for the persisted crawl run
//!
//! This module defines the state-machine vocabulary of a crawl run and the
//! encoding of that state into the persistent run store.
//!
//! # Components
//!
//! - `Phase`: the three state-machine phases (idle, discovering, harvesting)
//! - `CrawlQuery`: the operator-supplied inputs of one run
//! - `RunState`: everything persisted for a run, decoded from the store

mod phase;
mod run_state;

// Re-export main types
pub use phase::Phase;
pub use run_state::{
    clear_run, keys, persist_accumulated, persist_cursor, persist_item_ids, persist_phase,
    persist_query, reset_to_idle, CrawlQuery, RunState, ALL_KEYS,
};
