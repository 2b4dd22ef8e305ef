//! Comment extraction module
//!
//! This module turns rendered item-page markup into matched comment records:
//! - Locating the comment container by its structural marker
//! - Flattening the subtree into a depth-annotated node sequence
//! - Segmenting that sequence into per-comment field lists
//! - Keyword matching and record serialization
//!
//! Extraction is a pure function of the markup and options; it never touches
//! the run store and never navigates.

mod dom;
mod record;
mod segment;

pub use dom::{collect_nodes, CollectedNode};
pub use record::{match_segment, render_records, CommentRecord};
pub use segment::{merge_fields, split_segments, FIELD_MERGE_THRESHOLD};

use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// Markup-shape options for the extractor
///
/// These describe where the platform keeps its comments, not what to look
/// for in them; the defaults match the current markup and are overridable
/// from configuration.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// CSS selector of the comment container
    pub comment_container: String,

    /// Path prefix that identifies an author profile link
    pub profile_path_prefix: String,

    /// Fragments dropped from emitted records when a field equals one exactly
    pub filler_fragments: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            comment_container: ".comment-mainContent".to_string(),
            profile_path_prefix: "/user/".to_string(),
            filler_fragments: vec![
                "…".to_string(),
                "展开".to_string(),
                "show more".to_string(),
            ],
        }
    }
}

/// Extracts the comments matching `keywords` from rendered item-page markup
///
/// A page without the comment container yields no records rather than an
/// error, so one malformed item cannot halt a crawl. At most one record is
/// emitted per comment; the author field never participates in matching.
///
/// # Arguments
///
/// * `html` - The rendered page markup
/// * `keywords` - Filter keywords, matched case-insensitively as substrings
/// * `source_url` - The item page URL, recorded on each match
/// * `options` - Markup-shape options
///
/// # Returns
///
/// * `Ok(Vec<CommentRecord>)` - Matched records in comment order
/// * `Err(SieveError)` - The configured container selector is invalid
pub fn extract_comments(
    html: &str,
    keywords: &[String],
    source_url: &Url,
    options: &ExtractOptions,
) -> crate::Result<Vec<CommentRecord>> {
    let selector = container_selector(&options.comment_container)?;
    let document = Html::parse_document(html);

    let container = match document.select(&selector).next() {
        Some(container) => container,
        None => return Ok(Vec::new()),
    };

    let nodes = collect_nodes(container, source_url, &options.profile_path_prefix);
    let mut records = Vec::new();

    for segment in split_segments(&nodes) {
        let fields = merge_fields(segment);
        let matched = match match_segment(&fields, keywords) {
            Some(matched) => matched,
            None => continue,
        };

        let author_profile_url = segment
            .first()
            .and_then(|node| node.profile_url.as_ref())
            .map(Url::to_string)
            .unwrap_or_default();

        let fields = fields
            .into_iter()
            .filter(|field| !options.filler_fragments.iter().any(|f| f == field))
            .collect();

        records.push(CommentRecord {
            matched_keywords: matched,
            fields,
            source_url: source_url.to_string(),
            author_profile_url,
        });
    }

    Ok(records)
}

/// Returns true when the markup contains `selector`
///
/// Used as the render-readiness probe: a dynamically-populated page is
/// considered loaded once its structural marker is present.
pub fn marker_present(html: &str, selector: &str) -> crate::Result<bool> {
    let selector = container_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().is_some())
}

fn container_selector(selector: &str) -> crate::Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source_url() -> Url {
        Url::parse("https://www.douyin.com/video/111").unwrap()
    }

    fn keywords(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// Three comments in current platform markup: one English body, one with
    /// a nested reply, one CJK body followed by an expand placeholder
    fn comment_page() -> &'static str {
        r#"<html><head><title>item</title></head><body>
            <header><span>Douyin</span></header>
            <div class="comment-mainContent">
                <div class="comment-item">
                    <div class="comment-header"><a href="/user/MS4wLjABAAAA111"><span>UserOne</span></a></div>
                    <div class="comment-content"><p><span><span><span>Fine dining at West Lake</span></span></span></p></div>
                </div>
                <div class="comment-item">
                    <div class="comment-header"><a href="/user/MS4wLjABAAAA222"><span>UserTwo</span></a></div>
                    <div class="comment-content"><p><span><span><span>Nothing special here</span></span></span></p></div>
                    <div class="reply-list">
                        <div class="reply-item">
                            <div class="reply-header"><a href="/user/MS4wLjABAAAA333"><span><span><span>ReplyUser</span></span></span></a></div>
                        </div>
                    </div>
                </div>
                <div class="comment-item">
                    <div class="comment-header"><a href="/user/MS4wLjABAAAA444"><span>UserThree</span></a></div>
                    <div class="comment-content"><p><span><span><span>歌里唱的就是西湖</span></span></span></p>
                        <div class="expand"><span><span><span><span><span>展开</span></span></span></span></span></div>
                    </div>
                </div>
            </div>
        </body></html>"#
    }

    #[test]
    fn test_single_match_with_profile() {
        let records = extract_comments(
            comment_page(),
            &keywords(&["west lake"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.matched_keywords, keywords(&["west lake"]));
        assert_eq!(
            record.fields,
            keywords(&["UserOne", "Fine dining at West Lake"])
        );
        assert_eq!(record.source_url, "https://www.douyin.com/video/111");
        assert_eq!(
            record.author_profile_url,
            "https://www.douyin.com/user/MS4wLjABAAAA111"
        );
    }

    #[test]
    fn test_filler_fragment_is_dropped() {
        let records = extract_comments(
            comment_page(),
            &keywords(&["西湖"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields, keywords(&["UserThree", "歌里唱的就是西湖"]));
    }

    #[test]
    fn test_records_follow_comment_order() {
        let records = extract_comments(
            comment_page(),
            &keywords(&["西湖", "west lake"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields[0], "UserOne");
        assert_eq!(records[1].fields[0], "UserThree");
    }

    #[test]
    fn test_no_keyword_no_records() {
        let records = extract_comments(
            comment_page(),
            &keywords(&["coffee"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_author_name_alone_never_matches() {
        let records = extract_comments(
            comment_page(),
            &keywords(&["userone"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_container_yields_no_records() {
        let records = extract_comments(
            "<html><body><p>not an item page</p></body></html>",
            &keywords(&["foo"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_at_most_one_record_per_comment() {
        let html = r#"<html><body><div class="comment-mainContent">
            <div class="comment-item">
                <div class="comment-header"><a href="/user/a"><span>UserOne</span></a></div>
                <div class="comment-content"><p><span><span><span>foo in the body</span></span></span></p></div>
                <div class="reply-list">
                    <div class="reply-item">
                        <div class="reply-header"><a href="/user/b"><span><span><span>foo again deeper</span></span></span></a></div>
                    </div>
                </div>
            </div>
        </div></body></html>"#;

        let records = extract_comments(
            html,
            &keywords(&["foo"]),
            &source_url(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].fields,
            keywords(&["UserOne", "foo in the body", "foo again deeper"])
        );
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let options = ExtractOptions {
            comment_container: ":::".to_string(),
            ..ExtractOptions::default()
        };
        let result = extract_comments("<html></html>", &keywords(&["x"]), &source_url(), &options);
        assert!(result.is_err());
    }

    #[test]
    fn test_marker_present() {
        assert!(marker_present(comment_page(), ".comment-mainContent").unwrap());
        assert!(!marker_present("<html><body></body></html>", ".comment-mainContent").unwrap());
    }
}
