//! Run status reporting
//!
//! This module provides functionality for summarizing and displaying the
//! persisted state of a crawl run.

use crate::state::{CrawlQuery, Phase, RunState};
use crate::storage::{RunStore, StoreResult};

/// Summary of the persisted run state
#[derive(Debug, Clone)]
pub struct RunStatus {
    /// Current state-machine phase
    pub phase: Phase,

    /// Operator query, when one is fully persisted
    pub query: Option<CrawlQuery>,

    /// Number of discovered items
    pub items_discovered: usize,

    /// Index of the next item to harvest, when one is persisted
    pub next_item_index: Option<usize>,

    /// Matched comment lines accumulated so far
    pub matched_comments: usize,
}

impl From<&RunState> for RunStatus {
    fn from(state: &RunState) -> Self {
        Self {
            phase: state.phase,
            query: state.query.clone(),
            items_discovered: state.item_ids.len(),
            next_item_index: state.cursor,
            matched_comments: state.accumulated.lines().count(),
        }
    }
}

/// Loads the run status from the store
///
/// # Arguments
///
/// * `store` - The run store to read
///
/// # Returns
///
/// * `Ok(RunStatus)` - Successfully loaded status
/// * `Err(StoreError)` - Failed to read the store
pub fn load_status<S: RunStore + ?Sized>(store: &S) -> StoreResult<RunStatus> {
    let state = RunState::load(store)?;
    Ok(RunStatus::from(&state))
}

/// Prints the run status to stdout in a formatted manner
///
/// # Arguments
///
/// * `status` - The status to display
pub fn print_status(status: &RunStatus) {
    println!("=== Run Status ===\n");

    println!("Phase: {}", status.phase);

    match &status.query {
        Some(query) => {
            println!("Query:");
            println!("  Search term: {}", query.search_term);
            println!("  Filter keywords: {}", query.filter_keywords.join(", "));
            println!("  Item limit: {}", query.item_limit);
        }
        None => {
            println!("Query: none persisted");
        }
    }

    if status.phase == Phase::Idle && status.items_discovered == 0 {
        println!("\nNo run in progress.");
        return;
    }

    println!("Progress:");
    println!("  Items discovered: {}", status.items_discovered);
    match status.next_item_index {
        Some(index) => println!("  Next item index: {}", index),
        None => println!("  Next item index: -"),
    }
    println!("  Matched comments so far: {}", status.matched_comments);
}
