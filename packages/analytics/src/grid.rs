//! Spatial-temporal grid builder for the animated choropleth.
//!
//! Builds the dense (region × time bucket) grid from a filtered row set:
//! scaffold over every region/bucket combination, zero-fill the gaps, sum
//! per-bucket counts, then run a per-region cumulative sum over the
//! time-ordered buckets. The output is one [`GridCell`] per combination,
//! carrying the cumulative total, per-category cumulative counts, and the
//! log-scaled color value the renderer maps onto the polygon fill.
//!
//! Bucket policy: fixed-width, right-closed intervals `(end - width, end]`
//! with ends aligned to whole multiples of the width from the Unix epoch.
//! A timestamp exactly on a boundary belongs to the bucket ending there.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use relief_map_analytics_models::{ChoroplethSeries, ColorDomain, GridCell};
use relief_map_geography_models::RegionCatalog;
use relief_map_request_models::CategoryField;

use crate::filter::FilteredSet;

/// Fixed lower bound of the color domain. Cumulative totals below
/// `2^5 - 1` all clip to the base color.
pub const COLOR_DOMAIN_FLOOR: f64 = 5.0;

/// Format for bucket-end labels, the animation-frame keys.
pub(crate) const BUCKET_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which regions the grid scaffolds.
#[derive(Debug, Clone, Copy)]
pub enum RegionScope<'a> {
    /// Only regions with at least one row in the filtered set. A region
    /// whose rows are all filtered out is absent from the grid entirely.
    Observed,
    /// Every catalog region, present-as-zero when it has no rows.
    Catalog(&'a RegionCatalog),
}

/// Per-bucket (and later cumulative) counts for one grid cell.
#[derive(Debug, Clone)]
struct Accum {
    total: u64,
    by_level: Vec<u64>,
    by_kind: Vec<u64>,
}

impl Accum {
    fn zeroed(levels: usize, kinds: usize) -> Self {
        Self {
            total: 0,
            by_level: vec![0; levels],
            by_kind: vec![0; kinds],
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.total += other.total;
        for (acc, n) in self.by_level.iter_mut().zip(&other.by_level) {
            *acc += n;
        }
        for (acc, n) in self.by_kind.iter_mut().zip(&other.by_kind) {
            *acc += n;
        }
    }
}

/// Returns the end of the bucket containing `ts`.
pub(crate) fn bucket_end(ts: DateTime<Utc>, width: Duration) -> DateTime<Utc> {
    let width_secs = width.num_seconds();
    debug_assert!(width_secs > 0, "bucket width must be positive");

    let secs = ts.timestamp();
    let on_boundary = secs.rem_euclid(width_secs) == 0 && ts.timestamp_subsec_nanos() == 0;
    let k = secs.div_euclid(width_secs) + i64::from(!on_boundary);

    // Truncate the sub-second part before shifting onto the boundary.
    let base = ts - Duration::nanoseconds(i64::from(ts.timestamp_subsec_nanos()));
    base + Duration::seconds(k * width_secs - secs)
}

/// Formats a bucket end as its animation-frame key.
pub(crate) fn bucket_label(end: DateTime<Utc>) -> String {
    end.format(BUCKET_LABEL_FORMAT).to_string()
}

/// Returns the `[min, max]` timestamp span of a row set, or `None` when
/// it is empty.
pub(crate) fn timestamp_span(rows: &FilteredSet<'_>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut timestamps = rows.requests().map(|request| request.created_at);
    let first = timestamps.next()?;
    Some(timestamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
}

/// Builds the dense cumulative grid for `rows`.
///
/// An empty row set yields a well-formed empty series. The color domain
/// upper bound is the largest observed `log2(total + 1)`, never below the
/// floor so the domain cannot invert.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn build_choropleth(
    rows: &FilteredSet<'_>,
    bucket_width: Duration,
    scope: RegionScope<'_>,
) -> ChoroplethSeries {
    let Some((min_ts, max_ts)) = timestamp_span(rows) else {
        return ChoroplethSeries::empty(COLOR_DOMAIN_FLOOR);
    };

    let dataset = rows.dataset();
    let levels = dataset.domain(CategoryField::Level).values().to_vec();
    let kinds = dataset.domain(CategoryField::Kind).values().to_vec();

    let regions: Vec<String> = match scope {
        RegionScope::Catalog(catalog) => catalog.iter().map(str::to_string).collect(),
        RegionScope::Observed => {
            let mut observed: Vec<String> = Vec::new();
            for request in rows.requests() {
                if !observed.iter().any(|name| name == &request.region) {
                    observed.push(request.region.clone());
                }
            }
            observed
        }
    };
    let region_pos: HashMap<&str, usize> = regions
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    // Scaffold: every bucket from the first to the last occupied one.
    let first = bucket_end(min_ts, bucket_width);
    let last = bucket_end(max_ts, bucket_width);
    let width_secs = bucket_width.num_seconds();
    let mut bucket_ends = Vec::new();
    let mut end = first;
    while end <= last {
        bucket_ends.push(end);
        end += bucket_width;
    }
    let bucket_count = bucket_ends.len();

    // Per-bucket sums, zero-filled over the full cross-product.
    let mut per_bucket: Vec<Accum> =
        std::iter::repeat_with(|| Accum::zeroed(levels.len(), kinds.len()))
            .take(regions.len() * bucket_count)
            .collect();

    for &row in rows.indices() {
        let request = &dataset.requests()[row];
        let Some(&region_idx) = region_pos.get(request.region.as_str()) else {
            continue;
        };
        let offset = (bucket_end(request.created_at, bucket_width) - first).num_seconds();
        let bucket_idx = (offset / width_secs) as usize;

        let cell = &mut per_bucket[region_idx * bucket_count + bucket_idx];
        cell.total += 1;
        cell.by_level[dataset.code(row, CategoryField::Level)] += 1;
        cell.by_kind[dataset.code(row, CategoryField::Kind)] += 1;
    }

    // Per-region running sums over the time-ordered buckets.
    let mut cells = Vec::with_capacity(regions.len() * bucket_count);
    let mut max_color = COLOR_DOMAIN_FLOOR;

    for (region_idx, region) in regions.iter().enumerate() {
        let mut running = Accum::zeroed(levels.len(), kinds.len());
        for (bucket_idx, bucket) in bucket_ends.iter().enumerate() {
            running.absorb(&per_bucket[region_idx * bucket_count + bucket_idx]);

            let color_value = ((running.total + 1) as f64).log2();
            max_color = max_color.max(color_value);

            cells.push(GridCell {
                region: region.clone(),
                bucket: bucket_label(*bucket),
                total: running.total,
                by_level: running.by_level.clone(),
                by_kind: running.by_kind.clone(),
                color_value,
            });
        }
    }

    log::debug!(
        "Built choropleth grid: {} regions x {bucket_count} buckets from {} rows",
        regions.len(),
        rows.len()
    );

    ChoroplethSeries {
        buckets: bucket_ends.iter().copied().map(bucket_label).collect(),
        levels,
        kinds,
        cells,
        color_domain: ColorDomain {
            lower: COLOR_DOMAIN_FLOOR,
            upper: max_color,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use relief_map_request_models::HelpRequest;

    /// 2022-04-10 00:00:00 UTC, a whole multiple of the 12-hour width.
    const BASE: i64 = 1_649_548_800;

    fn request_at(region: &str, hours: i64, level: &str, kind: &str) -> HelpRequest {
        HelpRequest {
            created_at: DateTime::from_timestamp(BASE + hours * 3600, 0).unwrap(),
            region: region.to_string(),
            level: level.to_string(),
            kind: kind.to_string(),
            tags: None,
            content: None,
        }
    }

    fn cell<'a>(series: &'a ChoroplethSeries, region: &str, hours: i64) -> &'a GridCell {
        let label = bucket_label(DateTime::from_timestamp(BASE + hours * 3600, 0).unwrap());
        series
            .cells
            .iter()
            .find(|c| c.region == region && c.bucket == label)
            .unwrap()
    }

    #[test]
    fn bucket_boundaries_are_right_closed() {
        let width = Duration::hours(12);
        let on = DateTime::from_timestamp(BASE, 0).unwrap();
        assert_eq!(bucket_end(on, width), on);

        let just_after = DateTime::from_timestamp(BASE, 1).unwrap();
        assert_eq!(
            bucket_end(just_after, width),
            DateTime::from_timestamp(BASE + 12 * 3600, 0).unwrap()
        );

        let inside = DateTime::from_timestamp(BASE + 13 * 3600, 0).unwrap();
        assert_eq!(
            bucket_end(inside, width),
            DateTime::from_timestamp(BASE + 24 * 3600, 0).unwrap()
        );
    }

    #[test]
    fn cumulative_totals_follow_bucket_coverage() {
        let dataset = Dataset::new(vec![
            request_at("浦东新区", 0, "紧急", "物资"),
            request_at("浦东新区", 13, "紧急", "物资"),
            request_at("浦东新区", 25, "紧急", "物资"),
        ]);
        let rows = FilteredSet::all(&dataset);
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        assert_eq!(series.buckets.len(), 4);
        assert_eq!(cell(&series, "浦东新区", 0).total, 1);
        assert_eq!(cell(&series, "浦东新区", 12).total, 1);
        assert_eq!(cell(&series, "浦东新区", 24).total, 2);
        assert_eq!(cell(&series, "浦东新区", 36).total, 3);
    }

    #[test]
    fn grid_is_dense_over_regions_and_buckets() {
        let dataset = Dataset::new(vec![
            request_at("黄浦区", 1, "紧急", "物资"),
            request_at("徐汇区", 30, "极紧急", "重病"),
        ]);
        let rows = FilteredSet::all(&dataset);
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        assert_eq!(series.cells.len(), 2 * series.buckets.len());
        for region in ["黄浦区", "徐汇区"] {
            for bucket in &series.buckets {
                assert!(
                    series
                        .cells
                        .iter()
                        .any(|c| c.region == region && &c.bucket == bucket),
                    "missing cell for {region} at {bucket}"
                );
            }
        }
    }

    #[test]
    fn cumulative_series_is_monotone_and_ends_at_region_total() {
        let dataset = Dataset::new(vec![
            request_at("黄浦区", 2, "紧急", "物资"),
            request_at("黄浦区", 14, "极紧急", "重病"),
            request_at("黄浦区", 15, "紧急", "孕妇"),
            request_at("徐汇区", 3, "较急", "其它"),
        ]);
        let rows = FilteredSet::all(&dataset);
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        for region in ["黄浦区", "徐汇区"] {
            let totals: Vec<u64> = series
                .cells
                .iter()
                .filter(|c| c.region == region)
                .map(|c| c.total)
                .collect();
            assert!(totals.windows(2).all(|w| w[0] <= w[1]));

            let region_rows = dataset
                .requests()
                .iter()
                .filter(|r| r.region == region)
                .count() as u64;
            assert_eq!(*totals.last().unwrap(), region_rows);
        }
    }

    #[test]
    fn filtered_out_region_is_absent_under_observed_scope() {
        let dataset = Dataset::new(vec![
            request_at("黄浦区", 1, "极紧急", "物资"),
            request_at("徐汇区", 2, "紧急", "重病"),
        ]);
        let rows = FilteredSet::all(&dataset).refine(
            relief_map_request_models::CategoryField::Level,
            &relief_map_analytics_models::Selector::Value("极紧急".to_string()),
        );
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        assert!(series.cells.iter().all(|c| c.region == "黄浦区"));
    }

    #[test]
    fn catalog_scope_scaffolds_zero_regions() {
        let catalog = RegionCatalog::new(
            ["黄浦区", "徐汇区", "长宁区"].into_iter().map(String::from),
        );
        let dataset = Dataset::new(vec![request_at("黄浦区", 1, "紧急", "物资")]);
        let rows = FilteredSet::all(&dataset);
        let series =
            build_choropleth(&rows, Duration::hours(12), RegionScope::Catalog(&catalog));

        assert_eq!(series.cells.len(), 3 * series.buckets.len());
        let empty_cell = cell(&series, "长宁区", 12);
        assert_eq!(empty_cell.total, 0);
        assert!((empty_cell.color_value - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn color_values_are_log_scaled_and_domain_never_inverts() {
        let dataset = Dataset::new(vec![
            request_at("黄浦区", 1, "紧急", "物资"),
            request_at("黄浦区", 2, "紧急", "物资"),
            request_at("黄浦区", 3, "紧急", "物资"),
        ]);
        let rows = FilteredSet::all(&dataset);
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        let last = cell(&series, "黄浦区", 12);
        assert!((last.color_value - 2.0).abs() < 1e-9);
        assert!((series.color_domain.lower - COLOR_DOMAIN_FLOOR).abs() < f64::EPSILON);
        assert!((series.color_domain.upper - COLOR_DOMAIN_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let dataset = Dataset::new(Vec::new());
        let rows = FilteredSet::all(&dataset);
        let series = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);

        assert!(series.cells.is_empty());
        assert!(series.buckets.is_empty());
    }

    #[test]
    fn rebuilding_yields_identical_output() {
        let dataset = Dataset::new(vec![
            request_at("黄浦区", 2, "紧急", "物资"),
            request_at("徐汇区", 14, "极紧急", "重病"),
            request_at("黄浦区", 25, "较急", "孕妇"),
        ]);
        let rows = FilteredSet::all(&dataset);

        let first = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);
        let second = build_choropleth(&rows, Duration::hours(12), RegionScope::Observed);
        assert_eq!(first, second);
    }
}
