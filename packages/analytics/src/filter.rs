//! Filter engine: urgency-level and request-type predicates.
//!
//! A [`FilteredSet`] is a view over the dataset — the row indices that
//! survive the applied selectors. Selectors compose by logical AND, so
//! refinement order never changes the result.

use relief_map_analytics_models::{FilterParams, Selector};
use relief_map_request_models::{CategoryField, HelpRequest};

use crate::dataset::Dataset;

/// A filtered view over a [`Dataset`]: the indices of surviving rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredSet<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredSet<'a> {
    /// The unfiltered view: every row of the dataset.
    #[must_use]
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Applies both selectors of `params` to the dataset.
    #[must_use]
    pub fn apply(dataset: &'a Dataset, params: &FilterParams) -> Self {
        Self::all(dataset)
            .refine(CategoryField::Level, &params.level)
            .refine(CategoryField::Kind, &params.kind)
    }

    /// Retains rows matching `selector` on `field`.
    ///
    /// [`Selector::All`] is a no-op. A value outside the observed domain
    /// matches nothing, yielding an empty (but well-formed) view.
    #[must_use]
    pub fn refine(mut self, field: CategoryField, selector: &Selector) -> Self {
        let Selector::Value(value) = selector else {
            return self;
        };

        match self.dataset.domain(field).code_of(value) {
            Some(code) => {
                let dataset = self.dataset;
                self.indices
                    .retain(|&row| dataset.code(row, field) == code);
            }
            None => self.indices.clear(),
        }

        self
    }

    /// The dataset this view filters.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Surviving row indices, ascending.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterates the surviving records.
    pub fn requests(&self) -> impl Iterator<Item = &'a HelpRequest> + '_ {
        self.indices
            .iter()
            .map(|&row| &self.dataset.requests()[row])
    }

    /// Number of surviving rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no rows survive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use relief_map_request_models::HelpRequest;

    fn request(level: &str, kind: &str) -> HelpRequest {
        HelpRequest {
            created_at: DateTime::from_timestamp(1_650_000_000, 0).unwrap(),
            region: "徐汇区".to_string(),
            level: level.to_string(),
            kind: kind.to_string(),
            tags: None,
            content: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            request("极紧急", "重病"),
            request("紧急", "物资"),
            request("较急", "孕妇"),
            request("紧急", "其它"),
            request("极紧急", "物资"),
            request("较急", "物资"),
            request("紧急", "重病"),
        ])
    }

    fn level(value: &str) -> Selector {
        Selector::Value(value.to_string())
    }

    #[test]
    fn urgent_filter_keeps_exactly_matching_rows() {
        let dataset = dataset();
        let filtered = FilteredSet::all(&dataset).refine(CategoryField::Level, &level("极紧急"));

        assert_eq!(filtered.len(), 2);

        let domain = dataset.domain(CategoryField::Level);
        let code = domain.code_of("极紧急").unwrap();
        let indicator_sum: usize = filtered
            .indices()
            .iter()
            .filter(|&&row| dataset.indicator(row, CategoryField::Level, code))
            .count();
        assert_eq!(indicator_sum, 2);
    }

    #[test]
    fn selectors_commute() {
        let dataset = dataset();
        let urgency = level("紧急");
        let kind = Selector::Value("物资".to_string());

        let level_first = FilteredSet::all(&dataset)
            .refine(CategoryField::Level, &urgency)
            .refine(CategoryField::Kind, &kind);
        let kind_first = FilteredSet::all(&dataset)
            .refine(CategoryField::Kind, &kind)
            .refine(CategoryField::Level, &urgency);

        assert_eq!(level_first.indices(), kind_first.indices());
        assert_eq!(level_first.len(), 1);
    }

    #[test]
    fn refine_is_idempotent() {
        let dataset = dataset();
        let selector = level("较急");

        let once = FilteredSet::all(&dataset).refine(CategoryField::Level, &selector);
        let twice = once.clone().refine(CategoryField::Level, &selector);

        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn all_sentinel_is_a_no_op() {
        let dataset = dataset();
        let filtered = FilteredSet::apply(&dataset, &FilterParams::unfiltered());
        assert_eq!(filtered.len(), dataset.len());
    }

    #[test]
    fn unknown_value_matches_nothing() {
        let dataset = dataset();
        let filtered = FilteredSet::all(&dataset).refine(CategoryField::Level, &level("火急"));
        assert!(filtered.is_empty());
    }
}
