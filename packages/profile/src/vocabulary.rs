//! City-wide category vocabulary.

use std::collections::BTreeSet;

use amenity_map_district_models::Venue;
use serde::Serialize;

/// The distinct category labels observed across every venue of a city.
///
/// Labels are kept sorted (byte order) and unique, so the position of a
/// label is stable and can be used as a vector dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryVocabulary {
    labels: Vec<String>,
}

impl CategoryVocabulary {
    /// Derives the vocabulary from the venue lists of all districts.
    #[must_use]
    pub fn from_venue_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [Venue]>,
    {
        let labels: BTreeSet<&str> = lists
            .into_iter()
            .flatten()
            .map(|venue| venue.category.as_str())
            .collect();

        Self {
            labels: labels.into_iter().map(str::to_string).collect(),
        }
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no venue was observed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The labels in dimension order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Dimension of `label`, matched exactly (case-sensitive).
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    /// Returns `true` if `label` was observed in this city.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }
}
