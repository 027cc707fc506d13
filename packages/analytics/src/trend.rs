//! Trend-panel summaries: arrival series and categorical distributions.
//!
//! Purely descriptive views over whatever subset is handed in — filtering
//! has already happened upstream, and none of the three outputs feed back
//! into each other.

use std::collections::HashMap;

use chrono::Duration;
use relief_map_analytics_models::{CategoryCount, TimeSeriesPoint, TrendSummary};

use crate::filter::FilteredSet;
use crate::grid::{bucket_end, bucket_label, timestamp_span};

/// Summarizes a row subset: a dense fixed-interval arrival series over its
/// timestamp span, plus row counts grouped by region and by urgency level.
///
/// Histogram entries are sorted by descending count, ties by name, so the
/// output is deterministic. An empty subset yields empty outputs.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn summarize(rows: &FilteredSet<'_>, bucket_width: Duration) -> TrendSummary {
    let Some((min_ts, max_ts)) = timestamp_span(rows) else {
        return TrendSummary::empty();
    };

    let mut by_region: HashMap<&str, u64> = HashMap::new();
    let mut by_level: HashMap<&str, u64> = HashMap::new();
    for request in rows.requests() {
        *by_region.entry(request.region.as_str()).or_insert(0) += 1;
        *by_level.entry(request.level.as_str()).or_insert(0) += 1;
    }

    // Dense per-bucket tallies over the span, zero-filled.
    let first = bucket_end(min_ts, bucket_width);
    let last = bucket_end(max_ts, bucket_width);
    let width_secs = bucket_width.num_seconds();

    let mut bucket_ends = Vec::new();
    let mut end = first;
    while end <= last {
        bucket_ends.push(end);
        end += bucket_width;
    }

    let mut counts = vec![0u64; bucket_ends.len()];
    for request in rows.requests() {
        let offset = (bucket_end(request.created_at, bucket_width) - first).num_seconds();
        counts[(offset / width_secs) as usize] += 1;
    }

    let series = bucket_ends
        .iter()
        .zip(&counts)
        .map(|(end, &count)| TimeSeriesPoint {
            period: bucket_label(*end),
            count,
        })
        .collect();

    TrendSummary {
        series,
        by_region: sorted_counts(by_region),
        by_level: sorted_counts(by_level),
    }
}

/// Converts a count map into a descending-count list, ties by name.
fn sorted_counts(counts: HashMap<&str, u64>) -> Vec<CategoryCount> {
    let mut list: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    list.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
    });
    list
}
