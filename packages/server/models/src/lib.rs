#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the relief map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the internal pipeline types to allow independent evolution of the
//! API contract; table rows in particular keep the original export column
//! names (`createdAt`, `county`, `helpLevel`, `type`, ...) the frontend
//! table expects.

use chrono::{DateTime, Utc};
use relief_map_analytics_models::{
    ChoroplethSeries, FilterParams, Selector, TermCount, TrendSummary,
};
use relief_map_request_models::HelpRequest;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Initial map viewport for the choropleth renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Viewport center latitude.
    pub center_lat: f64,
    /// Viewport center longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: f64,
}

impl Default for MapView {
    /// Viewport centered on Shanghai, covering all districts.
    fn default() -> Self {
        Self {
            center_lat: 31.2,
            center_lon: 121.5,
            zoom: 7.8,
        }
    }
}

/// Query parameters shared by the filtered endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Urgency-level selector (a category value or `all`; omitted = `all`).
    pub level: Option<String>,
    /// Request-type selector (a category value or `all`; omitted = `all`).
    pub kind: Option<String>,
    /// When `true`, the choropleth scaffolds every catalog region,
    /// zero-valued where no rows match, instead of omitting them.
    pub include_empty_regions: Option<bool>,
}

impl FilterQueryParams {
    /// Converts the query parameters into pipeline filter parameters.
    #[must_use]
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            level: Selector::parse(self.level.as_deref()),
            kind: Selector::parse(self.kind.as_deref()),
        }
    }
}

/// Observed category domains offered as filter choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilters {
    /// Observed urgency-level values.
    pub levels: Vec<String>,
    /// Observed request-type values.
    pub kinds: Vec<String>,
}

/// Choropleth endpoint response: the grid series plus the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChoropleth {
    /// The dense cumulative grid and color domain.
    #[serde(flatten)]
    pub series: ChoroplethSeries,
    /// Initial viewport.
    pub map_view: MapView,
}

/// A help request in display form, as shown in the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequestRow {
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Canonical region name.
    pub county: String,
    /// Urgency level, original string value.
    pub help_level: String,
    /// Request type, original string value.
    #[serde(rename = "type")]
    pub kind: String,
    /// Comma-separated free-text tags.
    pub tags: Option<String>,
    /// Free-text request body.
    pub content_text: Option<String>,
}

impl From<&HelpRequest> for ApiRequestRow {
    fn from(request: &HelpRequest) -> Self {
        Self {
            created_at: request.created_at,
            county: request.region.clone(),
            help_level: request.level.clone(),
            kind: request.kind.clone(),
            tags: request.tags.clone(),
            content_text: request.content.clone(),
        }
    }
}

/// Trend endpoint response: the three summaries plus term frequencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrend {
    /// Arrival series and categorical distributions.
    #[serde(flatten)]
    pub summary: TrendSummary,
    /// Tag term frequencies for the text visualization.
    pub terms: Vec<TermCount>,
}
