use crate::extract::ExtractOptions;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for clipsieve
///
/// Every field has a default matching the current platform markup, so a
/// missing or empty configuration file is a valid one.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// Platform markup and URL-shape configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Platform host, without scheme
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Item-link pattern applied to listing markup; `{domain}` is replaced
    /// by the escaped host, and capture group 1 must carry the item id
    #[serde(rename = "item-link-pattern", default = "default_item_link_pattern")]
    pub item_link_pattern: String,

    /// CSS selector of the comment container on item pages
    #[serde(rename = "comment-container", default = "default_comment_container")]
    pub comment_container: String,

    /// Path prefix identifying author profile links
    #[serde(rename = "profile-path-prefix", default = "default_profile_path_prefix")]
    pub profile_path_prefix: String,

    /// CSS selector whose presence marks an authenticated session
    #[serde(rename = "logout-marker", default = "default_logout_marker")]
    pub logout_marker: String,

    /// Fragments dropped from records when a field equals one exactly
    #[serde(rename = "filler-fragments", default = "default_filler_fragments")]
    pub filler_fragments: Vec<String>,
}

/// Render-wait and reveal-loop timing (milliseconds)
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Upper bound on waiting for a page to finish rendering
    #[serde(rename = "render-timeout-ms", default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Delay between render-readiness probes
    #[serde(rename = "poll-interval-ms", default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Settle delay after each reveal before rescanning the listing
    #[serde(rename = "reveal-settle-ms", default = "default_reveal_settle_ms")]
    pub reveal_settle_ms: u64,
}

/// Run store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite run store
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Days after which untouched run state expires; absent keeps it until
    /// explicitly cleared
    #[serde(rename = "retention-days", default)]
    pub retention_days: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the final artifact file is written into
    #[serde(rename = "artifact-dir", default = "default_artifact_dir")]
    pub artifact_dir: String,
}

/// Default query values, shown to the operator and used when a start
/// command omits them
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Search term for discovering items
    #[serde(rename = "search-term", default)]
    pub search_term: String,

    /// Comment filter keywords
    #[serde(rename = "filter-keywords", default)]
    pub filter_keywords: Vec<String>,

    /// Cap on the number of items harvested per run
    #[serde(rename = "item-limit", default = "default_item_limit")]
    pub item_limit: usize,
}

impl Config {
    /// Builds the concrete item-id regex for the configured host
    pub fn item_pattern(&self) -> Result<regex::Regex, regex::Error> {
        let pattern = self
            .platform
            .item_link_pattern
            .replace("{domain}", &regex::escape(&self.platform.domain));
        regex::Regex::new(&pattern)
    }

    /// Extractor options derived from the platform section
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            comment_container: self.platform.comment_container.clone(),
            profile_path_prefix: self.platform.profile_path_prefix.clone(),
            filler_fragments: self.platform.filler_fragments.clone(),
        }
    }

    /// Upper bound on waiting for a page to finish rendering
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.timing.render_timeout_ms)
    }

    /// Delay between render-readiness probes
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.poll_interval_ms)
    }

    /// Settle delay after each reveal
    pub fn reveal_settle(&self) -> Duration {
        Duration::from_millis(self.timing.reveal_settle_ms)
    }

    /// Run store retention window, if one is configured
    pub fn store_retention(&self) -> Option<chrono::Duration> {
        self.store
            .retention_days
            .map(|days| chrono::Duration::days(i64::from(days)))
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            item_link_pattern: default_item_link_pattern(),
            comment_container: default_comment_container(),
            profile_path_prefix: default_profile_path_prefix(),
            logout_marker: default_logout_marker(),
            filler_fragments: default_filler_fragments(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            render_timeout_ms: default_render_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            reveal_settle_ms: default_reveal_settle_ms(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            retention_days: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            filter_keywords: Vec::new(),
            item_limit: default_item_limit(),
        }
    }
}

fn default_domain() -> String {
    "www.douyin.com".to_string()
}

fn default_item_link_pattern() -> String {
    r#"href="//{domain}/video/(\d+)""#.to_string()
}

fn default_comment_container() -> String {
    ExtractOptions::default().comment_container
}

fn default_profile_path_prefix() -> String {
    ExtractOptions::default().profile_path_prefix
}

fn default_logout_marker() -> String {
    ".logout-button".to_string()
}

fn default_filler_fragments() -> Vec<String> {
    ExtractOptions::default().filler_fragments
}

fn default_render_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_reveal_settle_ms() -> u64 {
    2000
}

fn default_store_path() -> String {
    "./clipsieve.db".to_string()
}

fn default_artifact_dir() -> String {
    ".".to_string()
}

fn default_item_limit() -> usize {
    5
}
