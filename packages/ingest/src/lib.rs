#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and cleaning of raw help-request data.
//!
//! Reads the tabular export, parses timestamps, normalizes region names
//! against the canonical catalog (applying the known-rename alias table),
//! and drops rows that cannot be placed on the map. Cleaning is a
//! best-effort pass: malformed rows disappear from all downstream views
//! rather than failing the load, but every drop is counted and logged.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use relief_map_geography_models::RegionCatalog;
use relief_map_request_models::HelpRequest;
use serde::Deserialize;
use thiserror::Error;

/// Known region renames in the raw data, mapped to their canonical names.
pub const REGION_ALIASES: &[(&str, &str)] = &[("浦东区", "浦东新区"), ("闸北区区", "闸北区")];

/// Errors that can occur while reading the event file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Event file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Event file could not be opened as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One raw row of the event export, before cleaning.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Submission timestamp, as exported.
    pub created_at: Option<String>,
    /// Raw region name.
    pub county: Option<String>,
    /// Urgency level.
    pub help_level: Option<String>,
    /// Request type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Comma-separated free-text tags.
    pub tags: Option<String>,
    /// Free-text request body.
    pub content_text: Option<String>,
}

/// Counts of rows dropped during cleaning, per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    /// Rows that could not be deserialized at all.
    pub malformed: usize,
    /// Rows with a missing or unparseable timestamp.
    pub missing_timestamp: usize,
    /// Rows whose region did not resolve to a catalog member.
    pub unknown_region: usize,
}

impl DropStats {
    /// Total rows dropped.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.malformed + self.missing_timestamp + self.unknown_region
    }
}

/// Parses an exported timestamp, accepting the common spreadsheet formats.
#[must_use]
pub fn parse_created_at(s: &str) -> Option<DateTime<Utc>> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
    ];

    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// Applies the alias table to a raw region name.
#[must_use]
pub fn resolve_region(raw: &str) -> &str {
    REGION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map_or(raw, |(_, canonical)| canonical)
}

/// Cleans raw records into [`HelpRequest`]s: parses timestamps, resolves
/// region names, and drops rows without a valid timestamp or a catalog
/// region. Drop counts are returned and logged.
#[must_use]
pub fn clean(records: Vec<RawRecord>, catalog: &RegionCatalog) -> (Vec<HelpRequest>, DropStats) {
    let mut kept = Vec::with_capacity(records.len());
    let mut stats = DropStats::default();

    for record in records {
        let Some(created_at) = record.created_at.as_deref().and_then(parse_created_at) else {
            stats.missing_timestamp += 1;
            continue;
        };

        let region = record.county.as_deref().map(resolve_region);
        let Some(region) = region.filter(|name| catalog.contains(name)) else {
            stats.unknown_region += 1;
            continue;
        };

        kept.push(HelpRequest {
            created_at,
            region: region.to_string(),
            level: record.help_level.unwrap_or_default(),
            kind: record.kind.unwrap_or_default(),
            tags: record.tags,
            content: record.content_text,
        });
    }

    if stats.total() > 0 {
        log::warn!(
            "Dropped {} rows during cleaning: {} missing timestamps, {} unresolvable regions, {} malformed",
            stats.total(),
            stats.missing_timestamp,
            stats.unknown_region,
            stats.malformed
        );
    }

    (kept, stats)
}

/// Reads the event CSV at `path` and cleans it against `catalog`.
///
/// Rows that fail to deserialize are skipped and counted rather than
/// failing the load; only an unreadable file is an error.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or read.
pub fn load_events(
    path: &Path,
    catalog: &RegionCatalog,
) -> Result<(Vec<HelpRequest>, DropStats), IngestError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    let mut malformed = 0usize;
    for row in reader.deserialize() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                malformed += 1;
                log::warn!("Skipping unreadable row in {}: {e}", path.display());
            }
        }
    }

    log::info!("Read {} raw records from {}", records.len(), path.display());

    let (kept, mut stats) = clean(records, catalog);
    stats.malformed = malformed;
    Ok((kept, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RegionCatalog {
        RegionCatalog::new(
            ["浦东新区", "闸北区", "黄浦区"]
                .into_iter()
                .map(String::from),
        )
    }

    fn record(created_at: Option<&str>, county: Option<&str>) -> RawRecord {
        RawRecord {
            created_at: created_at.map(String::from),
            county: county.map(String::from),
            help_level: Some("紧急".to_string()),
            kind: Some("物资".to_string()),
            tags: None,
            content_text: None,
        }
    }

    #[test]
    fn parses_common_timestamp_formats() {
        for raw in [
            "2022-04-10 08:30:00",
            "2022-04-10T08:30:00",
            "2022-04-10T08:30:00.000",
            "2022-04-10 08:30",
            "2022/04/10 08:30",
        ] {
            let ts = parse_created_at(raw).unwrap();
            assert_eq!(ts.to_string(), "2022-04-10 08:30:00 UTC");
        }
    }

    #[test]
    fn rejects_invalid_timestamp() {
        assert!(parse_created_at("not-a-date").is_none());
        assert!(parse_created_at("").is_none());
    }

    #[test]
    fn alias_table_maps_known_renames() {
        assert_eq!(resolve_region("浦东区"), "浦东新区");
        assert_eq!(resolve_region("闸北区区"), "闸北区");
        assert_eq!(resolve_region("黄浦区"), "黄浦区");
    }

    #[test]
    fn clean_drops_missing_timestamps() {
        let (kept, stats) = clean(
            vec![
                record(Some("2022-04-10 08:30:00"), Some("黄浦区")),
                record(None, Some("黄浦区")),
                record(Some("garbage"), Some("黄浦区")),
            ],
            &catalog(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(stats.missing_timestamp, 2);
    }

    #[test]
    fn clean_resolves_aliases_and_drops_unknown_regions() {
        let (kept, stats) = clean(
            vec![
                record(Some("2022-04-10 08:30:00"), Some("浦东区")),
                record(Some("2022-04-10 08:31:00"), Some("不存在区")),
                record(Some("2022-04-10 08:32:00"), None),
            ],
            &catalog(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].region, "浦东新区");
        assert_eq!(stats.unknown_region, 2);
    }

    #[test]
    fn surviving_rows_have_catalog_regions() {
        let catalog = catalog();
        let (kept, _) = clean(
            vec![
                record(Some("2022-04-10 08:30:00"), Some("浦东区")),
                record(Some("2022-04-10 08:31:00"), Some("闸北区区")),
                record(Some("2022-04-10 08:32:00"), Some("黄浦区")),
                record(Some("2022-04-10 08:33:00"), Some("静安区")),
            ],
            &catalog,
        );
        assert!(!kept.is_empty());
        for request in &kept {
            assert!(catalog.contains(&request.region));
        }
    }
}
