#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Temporal-spatial aggregation pipeline for the relief map.
//!
//! Takes the cleaned, immutable set of help requests and derives every
//! view the frontend consumes: the category expansion ([`dataset`]), the
//! filter engine ([`filter`]), the dense region×time choropleth grid with
//! cumulative counts ([`grid`]), the trend-panel summaries ([`trend`]), and
//! the free-text term frequencies ([`terms`]). Every derivation is a pure
//! function of (dataset, parameters) and is recomputed per request.

pub mod dataset;
pub mod filter;
pub mod grid;
pub mod terms;
pub mod trend;

pub use dataset::{CategoryDomain, Dataset};
pub use filter::FilteredSet;
pub use grid::{COLOR_DOMAIN_FLOOR, RegionScope, build_choropleth};
pub use terms::{TAG_DELIMITER, subset_term_frequencies, term_frequencies};
pub use trend::summarize;

use chrono::Duration;

/// Width of a choropleth animation bucket, in hours.
pub const MAP_BUCKET_HOURS: i64 = 12;

/// Width of a trend-panel arrival bucket, in minutes.
pub const TREND_BUCKET_MINUTES: i64 = 15;

/// The choropleth bucket width as a [`Duration`].
#[must_use]
pub fn map_bucket_width() -> Duration {
    Duration::hours(MAP_BUCKET_HOURS)
}

/// The trend bucket width as a [`Duration`].
#[must_use]
pub fn trend_bucket_width() -> Duration {
    Duration::minutes(TREND_BUCKET_MINUTES)
}
