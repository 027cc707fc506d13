#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region catalog types.
//!
//! The catalog is the canonical, ordered set of region names extracted from
//! the boundary feature collection. It is the join key between event records
//! and choropleth polygons: a record survives cleaning only if its region
//! name resolves to a catalog member.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The canonical set of administrative regions, in boundary-file order.
///
/// Membership checks are O(1); iteration preserves the order the regions
/// appear in the boundary feature collection. Serializes as a plain list
/// of names; the lookup index is rebuilt on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RegionCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for RegionCatalog {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<RegionCatalog> for Vec<String> {
    fn from(catalog: RegionCatalog) -> Self {
        catalog.names
    }
}

impl RegionCatalog {
    /// Builds a catalog from region names, dropping duplicates while
    /// keeping first-occurrence order.
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut catalog = Self::default();
        for name in names {
            if !catalog.index.contains_key(&name) {
                catalog.index.insert(name.clone(), catalog.names.len());
                catalog.names.push(name);
            }
        }
        catalog
    }

    /// Returns `true` if `name` is a canonical region.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the catalog position of `name`, if it is a member.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the catalog has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates region names in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns the region names as a slice, in catalog order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<'a> IntoIterator for &'a RegionCatalog {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_dedupes() {
        let catalog = RegionCatalog::new(
            ["黄浦区", "徐汇区", "黄浦区", "长宁区"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.iter().collect::<Vec<_>>(),
            vec!["黄浦区", "徐汇区", "长宁区"]
        );
        assert_eq!(catalog.position("徐汇区"), Some(1));
    }

    #[test]
    fn membership() {
        let catalog = RegionCatalog::new(["浦东新区".to_string()]);
        assert!(catalog.contains("浦东新区"));
        assert!(!catalog.contains("浦东区"));
        assert!(!catalog.is_empty());
    }
}
