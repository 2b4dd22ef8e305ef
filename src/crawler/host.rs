//! Page host port
//!
//! The orchestrator never talks to a live page directly; it drives whatever
//! sits behind this trait. A host knows the current location, hands over
//! rendered markup, simulates the platform's lazy loading, accepts navigation
//! requests, and delivers the final artifact to the operator.
//!
//! Navigation is fire-and-forget: requesting one ends the useful life of the
//! current execution, and the next execution starts from the run store with
//! no in-memory carry-over.

use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// Errors that can occur during host operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No snapshot directory at {0}")]
    MissingPagesDir(String),
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Trait for page host backends
pub trait PageHost {
    /// Current location, if the host has a page loaded
    fn location(&self) -> HostResult<Option<Url>>;

    /// Rendered markup of the current page
    fn body_html(&self) -> HostResult<String>;

    /// Triggers one round of the platform's lazy loading
    fn reveal_more(&mut self) -> HostResult<()>;

    /// Requests navigation to `target`
    ///
    /// Takes effect for the next execution; the caller must not read the
    /// current page afterwards.
    fn request_navigation(&mut self, target: &Url) -> HostResult<()>;

    /// Delivers the final artifact to the operator
    fn deliver_artifact(&mut self, name: &str, content: &str) -> HostResult<()>;
}

/// Polls the host until `is_ready` approves the rendered markup
///
/// Dynamically-populated pages have no completion signal, so readiness is
/// probed against a structural condition. Returns false when `timeout`
/// elapses first; callers proceed with whatever markup is present, which is
/// exactly what an empirically-tuned fixed delay would have done.
///
/// # Arguments
///
/// * `host` - The host to poll
/// * `is_ready` - Predicate over the rendered markup
/// * `poll_interval` - Delay between probes
/// * `timeout` - Upper bound on the total wait
pub async fn wait_for_render<H, F>(
    host: &H,
    is_ready: F,
    poll_interval: Duration,
    timeout: Duration,
) -> HostResult<bool>
where
    H: PageHost + ?Sized,
    F: Fn(&str) -> bool,
{
    let deadline = Instant::now() + timeout;

    loop {
        let body = host.body_html()?;
        if is_ready(&body) {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Scripted in-memory host for unit tests
///
/// Pages are keyed by exact URL string; each page is a sequence of reveal
/// stages. Revealing past the last stage keeps the final markup, which lets
/// tests exercise the enumerator's fixpoint exit.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedHost {
    pub location: Option<Url>,
    pub pages: std::collections::HashMap<String, Vec<String>>,
    pub stage: usize,
    pub reveals: usize,
    pub navigations: Vec<Url>,
    pub artifacts: Vec<(String, String)>,
}

#[cfg(test)]
impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, url: &str, stages: &[&str]) {
        self.pages
            .insert(url.to_string(), stages.iter().map(|s| s.to_string()).collect());
    }

    pub fn go_to(&mut self, url: &str) {
        self.location = Some(Url::parse(url).unwrap());
        self.stage = 0;
    }
}

#[cfg(test)]
impl PageHost for ScriptedHost {
    fn location(&self) -> HostResult<Option<Url>> {
        Ok(self.location.clone())
    }

    fn body_html(&self) -> HostResult<String> {
        let body = self
            .location
            .as_ref()
            .and_then(|location| self.pages.get(location.as_str()))
            .map(|stages| {
                let index = self.stage.min(stages.len().saturating_sub(1));
                stages.get(index).cloned().unwrap_or_default()
            })
            .unwrap_or_default();
        Ok(body)
    }

    fn reveal_more(&mut self) -> HostResult<()> {
        self.stage += 1;
        self.reveals += 1;
        Ok(())
    }

    fn request_navigation(&mut self, target: &Url) -> HostResult<()> {
        self.location = Some(target.clone());
        self.stage = 0;
        self.navigations.push(target.clone());
        Ok(())
    }

    fn deliver_artifact(&mut self, name: &str, content: &str) -> HostResult<()> {
        self.artifacts.push((name.to_string(), content.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_for_render_succeeds_when_marker_appears() {
        let mut host = ScriptedHost::new();
        host.add_page("https://www.douyin.com/video/1", &["<div class='ready'></div>"]);
        host.go_to("https://www.douyin.com/video/1");

        let ready = wait_for_render(
            &host,
            |body| body.contains("ready"),
            Duration::from_millis(1),
            Duration::from_millis(50),
        )
        .await
        .unwrap();

        assert!(ready);
    }

    #[tokio::test]
    async fn test_wait_for_render_times_out() {
        let mut host = ScriptedHost::new();
        host.add_page("https://www.douyin.com/video/1", &["<div></div>"]);
        host.go_to("https://www.douyin.com/video/1");

        let ready = wait_for_render(
            &host,
            |body| body.contains("never-there"),
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .await
        .unwrap();

        assert!(!ready);
    }

    #[test]
    fn test_scripted_host_reveal_advances_stage() {
        let mut host = ScriptedHost::new();
        host.add_page("https://www.douyin.com/search/x", &["one", "two"]);
        host.go_to("https://www.douyin.com/search/x");

        assert_eq!(host.body_html().unwrap(), "one");
        host.reveal_more().unwrap();
        assert_eq!(host.body_html().unwrap(), "two");
        host.reveal_more().unwrap();
        assert_eq!(host.body_html().unwrap(), "two");
    }

    #[test]
    fn test_scripted_host_without_page_serves_empty_body() {
        let host = ScriptedHost::new();
        assert_eq!(host.body_html().unwrap(), "");
    }
}
