//! Term-frequency extraction over free-text tags.
//!
//! Tags arrive as optional delimiter-separated strings; the extractor
//! tokenizes them and counts occurrences per distinct token for the text
//! visualization. No stemming, no stopword removal.

use std::collections::HashMap;

use relief_map_analytics_models::TermCount;

use crate::filter::FilteredSet;

/// Delimiter separating tokens within a tag string.
pub const TAG_DELIMITER: char = ',';

/// Computes term frequencies over a sequence of optional tag strings.
///
/// Null and empty entries are discarded, tokens are trimmed, empty tokens
/// dropped. The result is sorted by descending count, ties by token, and
/// is empty (not an error) when every input is missing or blank.
#[must_use]
pub fn term_frequencies<'a>(tags: impl IntoIterator<Item = Option<&'a str>>) -> Vec<TermCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for tag in tags.into_iter().flatten() {
        for token in tag.split(TAG_DELIMITER) {
            let token = token.trim();
            if !token.is_empty() {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
    }

    let mut table: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount {
            term: term.to_string(),
            count,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    table
}

/// Term frequencies over the tags of a filtered row set.
#[must_use]
pub fn subset_term_frequencies(rows: &FilteredSet<'_>) -> Vec<TermCount> {
    term_frequencies(rows.requests().map(|request| request.tags.as_deref()))
}
