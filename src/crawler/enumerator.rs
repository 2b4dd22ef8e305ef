//! Target enumeration over the search results view
//!
//! The search page reveals more results as it is scrolled, so enumeration is
//! an interaction loop, not a single scan: scan the markup, and while the
//! deduplicated id count is below the limit, trigger one reveal, wait for the
//! page to settle, and rescan. The candidate set only ever grows; a reveal
//! that grows nothing means the feed is exhausted and the loop ends.
//!
//! Without an authenticated session the platform does not lazy-load at all,
//! so enumeration degrades to the single scan.

use crate::crawler::host::PageHost;

use regex::Regex;
use std::time::Duration;

/// Scans markup for item ids, deduplicated in first-seen order
///
/// `pattern` must carry the id in capture group 1.
pub fn scan_ids(body: &str, pattern: &Regex) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();

    for captures in pattern.captures_iter(body) {
        if let Some(id) = captures.get(1) {
            let id = id.as_str().to_string();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }

    ids
}

/// Collects up to `limit` item ids from the host's current page
///
/// In the authenticated mode, reveals are issued only while the count is
/// below the limit; the loop never runs past the iteration that first
/// reaches it, and ends early at a fixpoint (a reveal that grows nothing).
/// Ids discovered earlier are never dropped by a later, smaller scan.
///
/// # Arguments
///
/// * `host` - Host whose current page is the search results view
/// * `pattern` - Id-extraction pattern, id in capture group 1
/// * `limit` - Cap on the number of ids returned
/// * `authenticated` - Whether reveal interactions are available
/// * `settle` - Delay after each reveal before rescanning
pub async fn enumerate_targets<H>(
    host: &mut H,
    pattern: &Regex,
    limit: usize,
    authenticated: bool,
    settle: Duration,
) -> crate::Result<Vec<String>>
where
    H: PageHost + ?Sized,
{
    let mut ids = scan_ids(&host.body_html()?, pattern);

    if !authenticated {
        ids.truncate(limit);
        tracing::debug!("Enumerated {} targets without reveal", ids.len());
        return Ok(ids);
    }

    while ids.len() < limit {
        host.reveal_more()?;
        tokio::time::sleep(settle).await;

        let revealed = scan_ids(&host.body_html()?, pattern);
        if !merge_new(&mut ids, revealed) {
            tracing::debug!("Reveal produced no new targets, stopping at {}", ids.len());
            break;
        }
    }

    ids.truncate(limit);
    Ok(ids)
}

/// Appends unseen ids, returning true when the set grew
fn merge_new(ids: &mut Vec<String>, revealed: Vec<String>) -> bool {
    let before = ids.len();
    for id in revealed {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.len() > before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::host::ScriptedHost;

    const SEARCH_URL: &str = "https://www.douyin.com/search/x?&type=video";

    fn pattern() -> Regex {
        Regex::new(r#"href="//www\.douyin\.com/video/(\d+)""#).unwrap()
    }

    fn listing(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| format!(r#"<a href="//www.douyin.com/video/{}" class="card">v</a>"#, id))
            .collect()
    }

    fn host_with_stages(stages: &[&[&str]]) -> ScriptedHost {
        let mut host = ScriptedHost::new();
        let bodies: Vec<String> = stages.iter().map(|ids| listing(ids)).collect();
        let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
        host.add_page(SEARCH_URL, &refs);
        host.go_to(SEARCH_URL);
        host
    }

    #[test]
    fn test_scan_deduplicates_in_first_seen_order() {
        let body = listing(&["2", "1", "2", "3", "1"]);
        assert_eq!(scan_ids(&body, &pattern()), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_scan_ignores_other_links() {
        let body = r#"<a href="//www.douyin.com/user/abc" class="x">u</a>"#;
        assert!(scan_ids(body, &pattern()).is_empty());
    }

    #[tokio::test]
    async fn test_limit_reached_on_first_scan_skips_reveals() {
        let mut host = host_with_stages(&[&["1", "2"], &["1", "2", "2", "3"], &["1", "2", "3"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 2, true, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(host.reveals, 0);
    }

    #[tokio::test]
    async fn test_reveal_loop_grows_up_to_limit() {
        let mut host = host_with_stages(&[&["1"], &["1", "2"], &["1", "2", "3", "4"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 3, true, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(host.reveals, 2);
    }

    #[tokio::test]
    async fn test_fixpoint_ends_loop_below_limit() {
        let mut host = host_with_stages(&[&["1"], &["1"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 5, true, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1"]);
        assert_eq!(host.reveals, 1);
    }

    #[tokio::test]
    async fn test_earlier_ids_survive_smaller_rescans() {
        // The second stage drops "1" from the markup but adds "3"; the
        // union keeps everything
        let mut host = host_with_stages(&[&["1", "2"], &["2", "3"], &["2", "3"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 4, true, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_single_pass() {
        let mut host = host_with_stages(&[&["1"], &["1", "2", "3"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 3, false, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1"]);
        assert_eq!(host.reveals, 0);
    }

    #[tokio::test]
    async fn test_zero_limit_yields_nothing() {
        let mut host = host_with_stages(&[&["1", "2"]]);

        let ids = enumerate_targets(&mut host, &pattern(), 0, true, Duration::from_millis(1))
            .await
            .unwrap();

        assert!(ids.is_empty());
        assert_eq!(host.reveals, 0);
    }
}
