//! Crawler module for the resumable comment-picking run
//!
//! This module contains the crawl logic, including:
//! - The page host port the orchestrator drives rendered pages through
//! - Target enumeration over the search results view
//! - The navigation-persisted state machine
//! - A snapshot-directory host for running against captured pages

mod enumerator;
mod host;
mod orchestrator;
mod snapshot;

pub use enumerator::{enumerate_targets, scan_ids};
pub use host::{wait_for_render, HostError, HostResult, PageHost};
pub use orchestrator::{Orchestrator, StepOutcome};
pub use snapshot::{snapshot_file_name, SnapshotHost};
