//! Depth-heuristic segmentation of the collected node sequence
//!
//! Comment markup carries no reliable per-comment wrapper classes, so comment
//! boundaries are reconstructed from node depths alone. The first collected
//! node sets the canonical comment-start depth; every later node at that
//! exact depth opens a new comment. Within a comment, nodes whose depths stay
//! within a small threshold of their predecessor belong to the same visual
//! fragment and are merged into one field; a larger jump starts a new field
//! (an author name versus its reply body, for example).
//!
//! Depths are absolute (measured from the document root), which keeps the
//! threshold rule independent of how deeply the comment list itself is
//! nested.

use crate::extract::dom::CollectedNode;

/// Largest depth difference between adjacent nodes that still counts as the
/// same field
pub const FIELD_MERGE_THRESHOLD: usize = 1;

/// Partitions the node sequence into per-comment segments
///
/// The first node's depth is canonical; each subsequent node at that depth
/// starts a new segment. An empty input yields no segments.
pub fn split_segments(nodes: &[CollectedNode]) -> Vec<&[CollectedNode]> {
    let mut segments = Vec::new();
    let canonical_depth = match nodes.first() {
        Some(first) => first.depth,
        None => return segments,
    };

    let mut start = 0;
    for (index, node) in nodes.iter().enumerate().skip(1) {
        if node.depth == canonical_depth {
            segments.push(&nodes[start..index]);
            start = index;
        }
    }
    segments.push(&nodes[start..]);

    segments
}

/// Merges a segment's nodes into fields by depth proximity
///
/// Adjacent nodes merge into the current field while their depths differ by
/// at most [`FIELD_MERGE_THRESHOLD`]; a larger jump starts a new field.
/// Merged text is concatenated without a separator, matching how split text
/// leaves of one rendered fragment read when joined.
pub fn merge_fields(segment: &[CollectedNode]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut previous_depth: Option<usize> = None;

    for node in segment {
        match previous_depth {
            Some(depth) if node.depth.abs_diff(depth) <= FIELD_MERGE_THRESHOLD => {
                if let Some(current) = fields.last_mut() {
                    current.push_str(&node.text);
                }
            }
            _ => fields.push(node.text.clone()),
        }
        previous_depth = Some(node.depth);
    }

    fields
}
