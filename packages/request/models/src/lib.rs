#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core help-request record types shared across the relief-map system.
//!
//! A [`HelpRequest`] is one cleaned crisis-assistance record: a timestamp,
//! a canonical administrative region, two categorical attributes (urgency
//! level and request type), and optional free text. Records are immutable
//! once loaded; every derived view downstream is recomputed from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single cleaned crisis-assistance record.
///
/// The `region` field always names a member of the region catalog — rows
/// that fail resolution never become a `HelpRequest`. The categorical
/// fields keep their original string values for display; the analytics
/// layer derives its own indexed representation from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// Canonical administrative region name (choropleth join key).
    pub region: String,
    /// Urgency level (e.g. "极紧急", "紧急", "较急").
    pub level: String,
    /// Request type (e.g. "重病", "物资", "孕妇").
    pub kind: String,
    /// Comma-separated free-text tags.
    pub tags: Option<String>,
    /// Free-text request body.
    pub content: Option<String>,
}

/// The categorical fields of a [`HelpRequest`] that support expansion into
/// per-value indicators and single-choice filtering.
///
/// The fields themselves are fixed; their value domains are derived from
/// the loaded data, not from an enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CategoryField {
    /// Urgency level of the request.
    Level,
    /// Kind of assistance requested.
    Kind,
}

impl CategoryField {
    /// Returns all categorical fields.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Level, Self::Kind]
    }

    /// Returns the value of this field on a record.
    #[must_use]
    pub fn value_of<'a>(self, request: &'a HelpRequest) -> &'a str {
        match self {
            Self::Level => &request.level,
            Self::Kind => &request.kind,
        }
    }
}
