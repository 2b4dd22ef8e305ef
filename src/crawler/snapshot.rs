//! Snapshot-directory page host
//!
//! Runs the state machine against captured pages on disk instead of a live
//! platform session. Each page is one or more HTML files in the snapshot
//! directory, named after the URL path:
//!
//! - `video-111.html` for `https://{domain}/video/111`
//! - `search-beaches.html` for `https://{domain}/search/beaches`
//!
//! Reveal stages are numbered suffixes: `search-beaches.html` is the initial
//! view, `search-beaches.1.html` what one reveal loads, and so on. A reveal
//! with no next stage file keeps the current markup, which the enumerator
//! treats as the feed being exhausted.

use crate::crawler::host::{HostError, HostResult, PageHost};
use crate::output::write_artifact;

use std::path::{Path, PathBuf};
use url::Url;

/// File stem a page snapshot is looked up under
///
/// Path segments are joined with `-`; characters that do not belong in a
/// file name are replaced with `_`. The query string is ignored.
pub fn snapshot_file_name(url: &Url) -> String {
    let joined = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        })
        .unwrap_or_default();

    let stem: String = joined
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "index".to_string()
    } else {
        stem
    }
}

/// Page host backed by a directory of captured pages
pub struct SnapshotHost {
    pages_dir: PathBuf,
    artifact_dir: PathBuf,
    location: Option<Url>,
    stage: usize,
}

impl SnapshotHost {
    /// Creates a host over `pages_dir`, delivering artifacts into `artifact_dir`
    ///
    /// # Arguments
    ///
    /// * `pages_dir` - Directory holding the captured page files
    /// * `artifact_dir` - Directory the final artifact is written into
    ///
    /// # Returns
    ///
    /// * `Ok(SnapshotHost)` - Ready to serve pages
    /// * `Err(HostError::MissingPagesDir)` - `pages_dir` is not a directory
    pub fn new(pages_dir: &Path, artifact_dir: &Path) -> HostResult<Self> {
        if !pages_dir.is_dir() {
            return Err(HostError::MissingPagesDir(
                pages_dir.display().to_string(),
            ));
        }

        Ok(Self {
            pages_dir: pages_dir.to_path_buf(),
            artifact_dir: artifact_dir.to_path_buf(),
            location: None,
            stage: 0,
        })
    }

    /// File path of `location`'s snapshot at reveal stage `stage`
    fn stage_path(&self, location: &Url, stage: usize) -> PathBuf {
        let stem = snapshot_file_name(location);
        let file = if stage == 0 {
            format!("{}.html", stem)
        } else {
            format!("{}.{}.html", stem, stage)
        };
        self.pages_dir.join(file)
    }
}

impl PageHost for SnapshotHost {
    fn location(&self) -> HostResult<Option<Url>> {
        Ok(self.location.clone())
    }

    fn body_html(&self) -> HostResult<String> {
        let location = match &self.location {
            Some(location) => location,
            None => return Ok(String::new()),
        };

        let path = self.stage_path(location, self.stage);
        if !path.is_file() {
            tracing::warn!("No snapshot at {}, serving an empty page", path.display());
            return Ok(String::new());
        }

        Ok(std::fs::read_to_string(path)?)
    }

    fn reveal_more(&mut self) -> HostResult<()> {
        let location = match &self.location {
            Some(location) => location.clone(),
            None => return Ok(()),
        };

        let next = self.stage_path(&location, self.stage + 1);
        if next.is_file() {
            self.stage += 1;
            tracing::debug!("Revealed stage {} of {}", self.stage, location);
        }

        Ok(())
    }

    fn request_navigation(&mut self, target: &Url) -> HostResult<()> {
        tracing::debug!("Navigating to {}", target);
        self.location = Some(target.clone());
        self.stage = 0;
        Ok(())
    }

    fn deliver_artifact(&mut self, name: &str, content: &str) -> HostResult<()> {
        let path = write_artifact(&self.artifact_dir, name, content)?;
        tracing::info!("Artifact written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn write_page(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_snapshot_file_name_from_paths() {
        assert_eq!(
            snapshot_file_name(&url("https://www.douyin.com/video/111")),
            "video-111"
        );
        assert_eq!(
            snapshot_file_name(&url("https://www.douyin.com/search/beaches?&type=video")),
            "search-beaches"
        );
        assert_eq!(
            snapshot_file_name(&url("https://www.douyin.com/search/street%20food")),
            "search-street_20food"
        );
        assert_eq!(snapshot_file_name(&url("https://www.douyin.com/")), "index");
    }

    #[test]
    fn test_missing_pages_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = SnapshotHost::new(&dir.path().join("absent"), dir.path());
        assert!(matches!(result, Err(HostError::MissingPagesDir(_))));
    }

    #[test]
    fn test_serves_staged_pages_and_stops_at_last_stage() {
        let pages = TempDir::new().unwrap();
        write_page(pages.path(), "search-x.html", "first");
        write_page(pages.path(), "search-x.1.html", "second");

        let mut host = SnapshotHost::new(pages.path(), pages.path()).unwrap();
        host.request_navigation(&url("https://www.douyin.com/search/x")).unwrap();

        assert_eq!(host.body_html().unwrap(), "first");
        host.reveal_more().unwrap();
        assert_eq!(host.body_html().unwrap(), "second");

        // No third stage on disk, so the markup stays put
        host.reveal_more().unwrap();
        assert_eq!(host.body_html().unwrap(), "second");
    }

    #[test]
    fn test_navigation_resets_the_reveal_stage() {
        let pages = TempDir::new().unwrap();
        write_page(pages.path(), "search-x.html", "first");
        write_page(pages.path(), "search-x.1.html", "second");
        write_page(pages.path(), "video-1.html", "item");

        let mut host = SnapshotHost::new(pages.path(), pages.path()).unwrap();
        host.request_navigation(&url("https://www.douyin.com/search/x")).unwrap();
        host.reveal_more().unwrap();
        host.request_navigation(&url("https://www.douyin.com/video/1")).unwrap();

        assert_eq!(host.body_html().unwrap(), "item");
        host.request_navigation(&url("https://www.douyin.com/search/x")).unwrap();
        assert_eq!(host.body_html().unwrap(), "first");
    }

    #[test]
    fn test_missing_snapshot_serves_empty_page() {
        let pages = TempDir::new().unwrap();
        let mut host = SnapshotHost::new(pages.path(), pages.path()).unwrap();
        host.request_navigation(&url("https://www.douyin.com/video/404")).unwrap();

        assert_eq!(host.body_html().unwrap(), "");
    }

    #[test]
    fn test_artifact_is_written_into_the_artifact_dir() {
        let pages = TempDir::new().unwrap();
        let artifacts = TempDir::new().unwrap();

        let mut host = SnapshotHost::new(pages.path(), artifacts.path()).unwrap();
        host.deliver_artifact("Result", "line\n").unwrap();

        let written = std::fs::read_to_string(artifacts.path().join("Result")).unwrap();
        assert_eq!(written, "line\n");
    }
}
