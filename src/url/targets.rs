//! Construction and recognition of platform URLs

use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the search results URL for a term
///
/// The platform serves video-only results when `type=video` is present; the
/// query keeps a leading ampersand because that is the exact form the site
/// links to itself with. Non-ASCII terms are percent-encoded by the URL
/// builder.
///
/// # Arguments
///
/// * `domain` - Platform host, without scheme
/// * `term` - Search term, verbatim
///
/// # Returns
///
/// * `Ok(Url)` - The search results URL
/// * `Err(UrlError)` - The domain does not form a valid base URL
pub fn search_url(domain: &str, term: &str) -> UrlResult<Url> {
    let mut url = parse_base(domain)?;
    url.path_segments_mut()
        .map_err(|_| UrlError::Malformed(format!("Cannot append path to host: {}", domain)))?
        .push("search")
        .push(term);
    url.set_query(Some("&type=video"));
    Ok(url)
}

/// Builds the item page URL for a video id
pub fn item_url(domain: &str, id: &str) -> UrlResult<Url> {
    item_kind_url(domain, "video", id)
}

/// Builds the item page URL for a note id
///
/// The platform serves image posts under `/note/` with the same comment
/// markup as videos.
pub fn note_url(domain: &str, id: &str) -> UrlResult<Url> {
    item_kind_url(domain, "note", id)
}

fn item_kind_url(domain: &str, kind: &str, id: &str) -> UrlResult<Url> {
    let mut url = parse_base(domain)?;
    url.path_segments_mut()
        .map_err(|_| UrlError::Malformed(format!("Cannot append path to host: {}", domain)))?
        .push(kind)
        .push(id);
    Ok(url)
}

fn parse_base(domain: &str) -> UrlResult<Url> {
    Url::parse(&format!("https://{}/", domain)).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Returns true when `location` is the item page for `id`
///
/// Matches both `/video/{id}` and `/note/{id}` paths, with or without a
/// trailing slash. The host is not compared; callers rebuild the canonical
/// item URL from configuration when they need to correct the location.
pub fn is_item_location(location: &Url, id: &str) -> bool {
    let mut segments: Vec<&str> = match location.path_segments() {
        Some(s) => s.collect(),
        None => return false,
    };
    while segments.last() == Some(&"") {
        segments.pop();
    }

    matches!(
        segments.as_slice(),
        [kind, item] if (*kind == "video" || *kind == "note") && *item == id
    )
}

/// Returns true when `location` is a search results page
pub fn is_search_location(location: &Url) -> bool {
    location
        .path_segments()
        .map_or(false, |mut segments| segments.next() == Some("search"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_shape() {
        let url = search_url("www.douyin.com", "street food").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.douyin.com/search/street%20food?&type=video"
        );
    }

    #[test]
    fn test_search_url_keeps_leading_ampersand() {
        let url = search_url("www.douyin.com", "food").unwrap();
        assert_eq!(url.query(), Some("&type=video"));
    }

    #[test]
    fn test_search_url_percent_encodes_cjk() {
        let url = search_url("www.douyin.com", "美食").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.douyin.com/search/%E7%BE%8E%E9%A3%9F?&type=video"
        );
    }

    #[test]
    fn test_item_url_shape() {
        let url = item_url("www.douyin.com", "7301234567890123456").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.douyin.com/video/7301234567890123456"
        );
    }

    #[test]
    fn test_note_url_shape() {
        let url = note_url("www.douyin.com", "7301234567890123456").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.douyin.com/note/7301234567890123456"
        );
    }

    #[test]
    fn test_bad_domain_is_rejected() {
        assert!(search_url("not a host", "food").is_err());
    }

    #[test]
    fn test_is_item_location_matches_video_and_note() {
        let video = Url::parse("https://www.douyin.com/video/111").unwrap();
        let note = Url::parse("https://www.douyin.com/note/111").unwrap();

        assert!(is_item_location(&video, "111"));
        assert!(is_item_location(&note, "111"));
    }

    #[test]
    fn test_is_item_location_tolerates_trailing_slash() {
        let url = Url::parse("https://www.douyin.com/video/111/").unwrap();
        assert!(is_item_location(&url, "111"));
    }

    #[test]
    fn test_is_item_location_rejects_other_ids() {
        let url = Url::parse("https://www.douyin.com/video/111").unwrap();
        assert!(!is_item_location(&url, "222"));
    }

    #[test]
    fn test_is_item_location_rejects_search_page() {
        let url = search_url("www.douyin.com", "food").unwrap();
        assert!(!is_item_location(&url, "food"));
    }

    #[test]
    fn test_is_search_location() {
        let search = search_url("www.douyin.com", "food").unwrap();
        let item = item_url("www.douyin.com", "111").unwrap();

        assert!(is_search_location(&search));
        assert!(!is_search_location(&item));
    }
}
