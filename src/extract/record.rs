//! Matched comment records and their serialized form

/// One comment that matched the keyword filter
///
/// Records are ephemeral; only their serialized lines are persisted, appended
/// to the run's accumulated result in harvest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Keywords found in the matching field, in filter order
    pub matched_keywords: Vec<String>,

    /// All text fields of the comment, author name first
    pub fields: Vec<String>,

    /// Item page URL the comment was extracted from
    pub source_url: String,

    /// Author profile URL, empty when none could be resolved
    pub author_profile_url: String,
}

impl CommentRecord {
    /// Serializes the record as one tab-separated line
    ///
    /// Column order: comma-joined matched keywords, the comment fields
    /// (tab-joined, author included), the item URL, the author profile URL.
    /// The line is newline-terminated.
    pub fn to_tsv_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.matched_keywords.join(","),
            self.fields.join("\t"),
            self.source_url,
            self.author_profile_url
        )
    }
}

/// Serializes records in order, one line each
pub fn render_records(records: &[CommentRecord]) -> String {
    records.iter().map(CommentRecord::to_tsv_line).collect()
}

/// Finds the matched keywords of the first matching field, if any
///
/// Fields are scanned from index 1; the author field never participates.
/// Matching is case-insensitive substring containment. The returned keywords
/// are those found in the first field that matched at all, in filter order.
pub fn match_segment(fields: &[String], keywords: &[String]) -> Option<Vec<String>> {
    for field in fields.iter().skip(1) {
        let lowered = field.to_lowercase();
        let matched: Vec<String> = keywords
            .iter()
            .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
            .cloned()
            .collect();
        if !matched.is_empty() {
            return Some(matched);
        }
    }

    None
}
