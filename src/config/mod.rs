//! Configuration module for clipsieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default matching the current platform markup, so running
//! without a configuration file is supported.
//!
//! # Example
//!
//! ```no_run
//! use clipsieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("clipsieve.toml")).unwrap();
//! println!("Crawling {} with item limit {}", config.platform.domain, config.query.item_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, PlatformConfig, QueryConfig, StoreConfig, TimingConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, load_config_with_hash};
