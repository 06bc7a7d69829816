//! Tag collection rules shared by the editor widget, the CLI and storage.
//!
//! Everything in here is pure: functions take the caller's collection by
//! reference and hand back a new one, so the owner of the collection decides
//! what to do with the result.

/// A change the editor can request against a tag collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAction {
    /// Normalize the text and append it if it is new
    Commit(String),
    /// Remove the tag with exactly this value
    Remove(String),
    /// Remove the most recently added tag
    RemoveLast,
}

/// Normalize raw user text into tag form (trimmed, lower-cased)
/// Returns None for empty or whitespace-only input
pub fn normalize_tag(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Case-insensitive membership check against a collection
pub fn contains_tag(tags: &[String], tag: &str) -> bool {
    let needle = tag.to_lowercase();
    tags.iter().any(|t| t.to_lowercase() == needle)
}

/// Apply an action and return the resulting collection.
/// Rejected actions (empty, duplicate, absent tag) return an unchanged copy.
pub fn apply_action(tags: &[String], action: &TagAction) -> Vec<String> {
    match action {
        TagAction::Commit(raw) => match normalize_tag(raw) {
            Some(tag) if !contains_tag(tags, &tag) => {
                let mut next = tags.to_vec();
                next.push(tag);
                next
            }
            _ => tags.to_vec(),
        },
        TagAction::Remove(tag) => tags.iter()
            .filter(|t| *t != tag)
            .cloned()
            .collect(),
        TagAction::RemoveLast => {
            let mut next = tags.to_vec();
            next.pop();
            next
        }
    }
}

/// Suggestions whose text contains `query` (case-insensitive), minus the ones
/// already in the collection. Order follows the suggestion list.
pub fn filter_suggestions<'a>(suggestions: &'a [String], tags: &[String], query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    suggestions.iter()
        .filter(|s| s.to_lowercase().contains(&query))
        .filter(|s| !contains_tag(tags, s))
        .map(String::as_str)
        .collect()
}

/// Parse tags from a comma-separated string
/// Returns normalized tags in input order with duplicates dropped
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    let mut parsed = Vec::new();
    if let Some(tags_str) = tags {
        for part in tags_str.split(',') {
            parsed = apply_action(&parsed, &TagAction::Commit(part.to_string()));
        }
    }
    parsed
}

/// Format tags as a string with brackets: [tag1] [tag2] [tag3]
pub fn format_tags_brackets(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("[{}]", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge suggestion sources, keeping the first spelling of each entry
pub fn merge_suggestions(sources: &[&[String]]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for source in sources {
        for candidate in source.iter() {
            let candidate = candidate.trim();
            if !candidate.is_empty() && !contains_tag(&merged, candidate) {
                merged.push(candidate.to_string());
            }
        }
    }
    merged
}
