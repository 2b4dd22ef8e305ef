//! Output module for delivering run results
//!
//! This module handles:
//! - Writing the final artifact document of a completed run
//! - Summarizing and displaying persisted run state

mod artifact;
pub mod status;

pub use artifact::{write_artifact, ARTIFACT_FILE_NAME};
pub use status::{load_status, print_status, RunStatus};
