//! Clipsieve: a keyword comment sieve for short-video pages
//!
//! This crate implements a resumable comment-picking crawl over a short-video
//! platform: it enumerates the videos matching a search term, visits each item
//! page, and extracts the comments containing a set of filter keywords. All
//! mutable crawl state lives in a persistent key/value run store, so a run
//! interrupted at any point resumes exactly where it left off on the next
//! execution.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for clipsieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Page host error: {0}")]
    Host(#[from] crawler::HostError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid item-link pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run stalled after {executions} executions without reaching a terminal state")]
    Stalled { executions: usize },

    #[error("Cannot start a run: {0}")]
    BadQuery(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid item-link pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid CSS selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for clipsieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Orchestrator, PageHost, SnapshotHost, StepOutcome};
pub use extract::CommentRecord;
pub use state::{CrawlQuery, Phase, RunState};
pub use storage::{MemoryStore, RunStore, SqliteStore};
