//! Collection of text-bearing nodes from a comment subtree
//!
//! The segmentation heuristic does not consume the DOM directly. This module
//! flattens a comment subtree into the plain node sequence it operates on:
//! document order, with each node carrying its text, its depth from the
//! document root, and the profile link of its nearest link ancestor (if any).

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

/// One text-bearing leaf collected from the comment subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedNode {
    /// Whitespace-normalized text content
    pub text: String,

    /// Distance from the document root
    pub depth: usize,

    /// Resolved profile link of the nearest enclosing anchor, if it points
    /// at a profile path
    pub profile_url: Option<Url>,
}

/// Collects the text-bearing leaves under `root` in document order
///
/// Whitespace-only leaves are skipped. Relative profile hrefs are resolved
/// against `source_url`; an anchor whose resolved path does not start with
/// `profile_prefix` is treated as any other element.
///
/// # Arguments
///
/// * `root` - The comment container element
/// * `source_url` - Page URL used to resolve relative hrefs
/// * `profile_prefix` - Path prefix that identifies a profile link
pub fn collect_nodes(
    root: ElementRef<'_>,
    source_url: &Url,
    profile_prefix: &str,
) -> Vec<CollectedNode> {
    let mut collected = Vec::new();
    descend(*root, source_url, profile_prefix, None, &mut collected);
    collected
}

fn descend(
    node: NodeRef<'_, Node>,
    source_url: &Url,
    profile_prefix: &str,
    active_link: Option<&Url>,
    out: &mut Vec<CollectedNode>,
) {
    // An inner profile anchor shadows any outer one for its subtree
    let own_link = profile_link(node, source_url, profile_prefix);
    let link = own_link.as_ref().or(active_link);

    if let Node::Text(text) = node.value() {
        let normalized = normalize_ws(text);
        if !normalized.is_empty() {
            out.push(CollectedNode {
                text: normalized,
                depth: node.ancestors().count(),
                profile_url: link.cloned(),
            });
        }
        return;
    }

    for child in node.children() {
        descend(child, source_url, profile_prefix, link, out);
    }
}

/// Resolves `node`'s href when it is an anchor onto a profile path
fn profile_link(node: NodeRef<'_, Node>, source_url: &Url, profile_prefix: &str) -> Option<Url> {
    let element = match node.value() {
        Node::Element(element) => element,
        _ => return None,
    };
    if element.name() != "a" {
        return None;
    }

    let href = element.attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = source_url.join(href).ok()?;
    if resolved.path().starts_with(profile_prefix) {
        Some(resolved)
    } else {
        None
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
