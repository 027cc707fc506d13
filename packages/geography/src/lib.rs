#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary feature collection loading and region catalog extraction.
//!
//! Parses the administrative boundary `GeoJSON` file and derives the
//! canonical [`RegionCatalog`] from each feature's `properties.name`. The
//! parsed collection is kept alongside the catalog so the server can hand
//! the polygons straight to the choropleth renderer.

use std::path::Path;

use relief_map_geography_models::RegionCatalog;
use thiserror::Error;

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Boundary file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Boundary file is not a valid `GeoJSON` feature collection.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Boundary file is structurally unusable.
    #[error("Boundary error: {message}")]
    Boundary {
        /// Description of what went wrong.
        message: String,
    },
}

/// The loaded boundary dataset: polygon features plus the region catalog
/// derived from them.
#[derive(Debug, Clone)]
pub struct Boundaries {
    /// The full feature collection, served verbatim to the map renderer.
    pub collection: geojson::FeatureCollection,
    /// Canonical region names in feature order.
    pub catalog: RegionCatalog,
}

/// Loads the boundary `GeoJSON` file at `path` and extracts the region
/// catalog from each feature's `properties.name`.
///
/// Features without a string `name` property are skipped with a warning —
/// they can never be joined to event data, so carrying them would only
/// produce unreachable polygons.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not a valid
/// `GeoJSON` feature collection, or yields no usable region names.
pub fn load_boundaries(path: &Path) -> Result<Boundaries, GeoError> {
    let raw = std::fs::read_to_string(path)?;
    let collection: geojson::FeatureCollection = serde_json::from_str(&raw)?;

    let catalog = catalog_from_collection(&collection);

    if catalog.is_empty() {
        return Err(GeoError::Boundary {
            message: format!("no features in {} carry a name property", path.display()),
        });
    }

    log::info!(
        "Loaded {} region boundaries from {}",
        catalog.len(),
        path.display()
    );

    Ok(Boundaries {
        collection,
        catalog,
    })
}

/// Derives a [`RegionCatalog`] from a feature collection's `properties.name`
/// values, skipping (and warning about) features without one.
#[must_use]
pub fn catalog_from_collection(collection: &geojson::FeatureCollection) -> RegionCatalog {
    let mut names = Vec::with_capacity(collection.features.len());

    for (idx, feature) in collection.features.iter().enumerate() {
        match feature_name(feature) {
            Some(name) => names.push(name.to_string()),
            None => log::warn!("Boundary feature #{idx} has no name property, skipping"),
        }
    }

    RegionCatalog::new(names)
}

/// Returns the `properties.name` string of a feature, if present.
fn feature_name(feature: &geojson::Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()?
        .get("name")?
        .as_str()
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: &str) -> geojson::FeatureCollection {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_names_in_feature_order() {
        let fc = collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"name": "黄浦区"}, "geometry": null},
                    {"type": "Feature", "properties": {"name": "徐汇区"}, "geometry": null}
                ]
            }"#,
        );
        let catalog = catalog_from_collection(&fc);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec!["黄浦区", "徐汇区"]);
    }

    #[test]
    fn skips_features_without_name() {
        let fc = collection(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"adcode": 310101}, "geometry": null},
                    {"type": "Feature", "properties": {"name": ""}, "geometry": null},
                    {"type": "Feature", "properties": {"name": "静安区"}, "geometry": null}
                ]
            }"#,
        );
        let catalog = catalog_from_collection(&fc);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("静安区"));
    }
}
