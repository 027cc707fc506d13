//! Dataset construction and category expansion.
//!
//! At load time each categorical field is expanded from its observed string
//! values into a [`CategoryDomain`] (the ordered distinct values) plus one
//! value code per row. This replaces per-row string comparison in every
//! downstream aggregation: a row "has indicator 1" for a value exactly when
//! its code equals that value's position in the domain, so exactly one
//! indicator per field holds per row.

use relief_map_request_models::{CategoryField, HelpRequest};

/// The ordered distinct values observed for one categorical field.
///
/// Values keep first-observation order. Domains are small (a handful of
/// urgency levels or request types), so lookups scan linearly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDomain {
    values: Vec<String>,
}

impl CategoryDomain {
    /// Returns the code for `value`, inserting it if unseen.
    fn observe(&mut self, value: &str) -> usize {
        self.code_of(value).unwrap_or_else(|| {
            self.values.push(value.to_string());
            self.values.len() - 1
        })
    }

    /// Returns the code of `value`, if it was observed.
    #[must_use]
    pub fn code_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Returns the value label for `code`.
    ///
    /// # Panics
    ///
    /// Panics if `code` is out of range for this domain.
    #[must_use]
    pub fn label(&self, code: usize) -> &str {
        &self.values[code]
    }

    /// The distinct values, in first-observation order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values were observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-row category codes, one per [`CategoryField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCode {
    /// Code into the urgency-level domain.
    pub level: usize,
    /// Code into the request-type domain.
    pub kind: usize,
}

/// The immutable, expanded event set: cleaned records plus the category
/// index derived from them.
///
/// Built once at startup and shared read-only; all derived views are
/// recomputed from it per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    requests: Vec<HelpRequest>,
    levels: CategoryDomain,
    kinds: CategoryDomain,
    codes: Vec<CategoryCode>,
}

impl Dataset {
    /// Builds the dataset, expanding both categorical fields.
    #[must_use]
    pub fn new(requests: Vec<HelpRequest>) -> Self {
        let mut levels = CategoryDomain::default();
        let mut kinds = CategoryDomain::default();

        let codes = requests
            .iter()
            .map(|request| CategoryCode {
                level: levels.observe(&request.level),
                kind: kinds.observe(&request.kind),
            })
            .collect();

        Self {
            requests,
            levels,
            kinds,
            codes,
        }
    }

    /// The cleaned records, in load order.
    #[must_use]
    pub fn requests(&self) -> &[HelpRequest] {
        &self.requests
    }

    /// The observed value domain for a categorical field.
    #[must_use]
    pub const fn domain(&self, field: CategoryField) -> &CategoryDomain {
        match field {
            CategoryField::Level => &self.levels,
            CategoryField::Kind => &self.kinds,
        }
    }

    /// The category code of row `row` for `field`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    #[must_use]
    pub fn code(&self, row: usize, field: CategoryField) -> usize {
        match field {
            CategoryField::Level => self.codes[row].level,
            CategoryField::Kind => self.codes[row].kind,
        }
    }

    /// Returns `true` if row `row` carries the indicator for `field` value
    /// number `code`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    #[must_use]
    pub fn indicator(&self, row: usize, field: CategoryField, code: usize) -> bool {
        self.code(row, field) == code
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
