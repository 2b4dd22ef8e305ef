//! URL handling module for clipsieve
//!
//! This module builds and recognizes the platform locations a crawl run
//! touches: the search results page and the item pages discovered from it.

mod targets;

// Re-export main functions
pub use targets::{is_item_location, is_search_location, item_url, note_url, search_url};
