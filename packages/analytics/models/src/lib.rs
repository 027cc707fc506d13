#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types for the derived views of the aggregation pipeline.
//!
//! Everything here is recomputed per request from the immutable dataset:
//! filter selectors in, choropleth series / trend summaries / term tables
//! out. The types are serialized to JSON for the API, so field names follow
//! the camelCase convention of the rest of the system.

use serde::{Deserialize, Serialize};

/// The sentinel selector value meaning "no filtering on this field".
pub const ALL_SENTINEL: &str = "all";

/// A single-choice filter selector: either one category value or the
/// `all` sentinel.
///
/// Serializes as the plain string form: the sentinel for [`Selector::All`],
/// the value itself otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    /// Keep only rows whose field equals this category value.
    Value(String),
    /// No filtering (the UI's `全部` choice).
    All,
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Self::parse(Some(&raw))
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl Selector {
    /// Parses a query-parameter string: the literal [`ALL_SENTINEL`] maps
    /// to [`Selector::All`], anything else names a category value. `None`
    /// (an omitted parameter) also means [`Selector::All`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::All,
            Some(s) if s == ALL_SENTINEL => Self::All,
            Some(s) => Self::Value(s.to_string()),
        }
    }

    /// Returns `true` for the [`Selector::All`] sentinel.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_SENTINEL}"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Filter parameters for one request: a selector per categorical field.
///
/// Selectors compose by logical AND and are order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Urgency-level selector.
    pub level: Selector,
    /// Request-type selector.
    pub kind: Selector,
}

impl FilterParams {
    /// Parameters that keep every row.
    #[must_use]
    pub const fn unfiltered() -> Self {
        Self {
            level: Selector::All,
            kind: Selector::All,
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::unfiltered()
    }
}

/// One cell of the dense spatial-temporal grid: the cumulative state of a
/// region at the end of one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Canonical region name (choropleth join key).
    pub region: String,
    /// Stringified bucket-end timestamp, used as the animation-frame key.
    pub bucket: String,
    /// Cumulative request count up to and including this bucket.
    pub total: u64,
    /// Cumulative counts per urgency-level value, indexed like
    /// [`ChoroplethSeries::levels`].
    pub by_level: Vec<u64>,
    /// Cumulative counts per request-type value, indexed like
    /// [`ChoroplethSeries::kinds`].
    pub by_kind: Vec<u64>,
    /// `log2(total + 1)`, the value the renderer maps to color.
    pub color_value: f64,
}

/// The color scale bounds handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDomain {
    /// Fixed lower bound; color values below it clip to the base color.
    pub lower: f64,
    /// Largest observed color value across the whole series.
    pub upper: f64,
}

/// The full animated-choropleth series: one [`GridCell`] per
/// (region, bucket) pair, dense over the bucket span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethSeries {
    /// All bucket keys in ascending time order.
    pub buckets: Vec<String>,
    /// Urgency-level value labels for [`GridCell::by_level`].
    pub levels: Vec<String>,
    /// Request-type value labels for [`GridCell::by_kind`].
    pub kinds: Vec<String>,
    /// Grid cells, grouped by region, buckets ascending within a region.
    pub cells: Vec<GridCell>,
    /// Color scale bounds.
    pub color_domain: ColorDomain,
}

impl ChoroplethSeries {
    /// A well-formed series with no data, used when the filtered set is
    /// empty.
    #[must_use]
    pub fn empty(lower: f64) -> Self {
        Self {
            buckets: Vec::new(),
            levels: Vec::new(),
            kinds: Vec::new(),
            cells: Vec::new(),
            color_domain: ColorDomain {
                lower,
                upper: lower,
            },
        }
    }
}

/// A point in a fixed-interval count series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Bucket-end label.
    pub period: String,
    /// Requests in this bucket (not cumulative).
    pub count: u64,
}

/// Count of rows sharing one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The categorical value (region name or urgency level).
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// Occurrence count of one free-text tag token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermCount {
    /// The token.
    pub term: String,
    /// Occurrences across the subset.
    pub count: u64,
}

/// The three descriptive views of the trend panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// Fixed-interval arrival counts over the subset's timestamp span.
    pub series: Vec<TimeSeriesPoint>,
    /// Row counts per region, descending.
    pub by_region: Vec<CategoryCount>,
    /// Row counts per urgency level, descending.
    pub by_level: Vec<CategoryCount>,
}

impl TrendSummary {
    /// A well-formed summary with no data.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            series: Vec::new(),
            by_region: Vec::new(),
            by_level: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parse_sentinel() {
        assert_eq!(Selector::parse(None), Selector::All);
        assert_eq!(Selector::parse(Some("all")), Selector::All);
        assert_eq!(
            Selector::parse(Some("极紧急")),
            Selector::Value("极紧急".to_string())
        );
    }

    #[test]
    fn selector_display_roundtrip() {
        assert_eq!(Selector::All.to_string(), "all");
        let value = Selector::Value("物资".to_string());
        assert_eq!(Selector::parse(Some(&value.to_string())), value);
    }

    #[test]
    fn empty_series_is_well_formed() {
        let series = ChoroplethSeries::empty(5.0);
        assert!(series.cells.is_empty());
        assert!(series.buckets.is_empty());
        assert!((series.color_domain.upper - 5.0).abs() < f64::EPSILON);
    }
}
