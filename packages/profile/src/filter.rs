//! Category filter: full profiles to fixed priority vectors.
//!
//! The reduced vector keeps each priority category's share of *all*
//! nearby venues. It is not renormalized, so its entries usually sum to
//! less than 1.0.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ProfileError;
use crate::profile::DistrictProfile;
use crate::vocabulary::CategoryVocabulary;

/// Default priority categories of the reference analysis.
pub const DEFAULT_PRIORITY_CATEGORIES: &[&str] = &[
    "Supermarket",
    "Shopping",
    "Café",
    "Restaurant",
    "Gym",
    "Cinema",
    "Library",
    "Medical Centre",
    "Park",
];

/// Ordered, non-empty, duplicate-free list of categories of interest.
///
/// The order defines the dimension order of every [`ReducedProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PriorityCategories(Vec<String>);

impl PriorityCategories {
    /// Validates and wraps a priority list.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyPriorityCategories`] for an empty
    /// list and [`ProfileError::DuplicatePriorityCategory`] if a label
    /// repeats.
    pub fn new(labels: Vec<String>) -> Result<Self, ProfileError> {
        if labels.is_empty() {
            return Err(ProfileError::EmptyPriorityCategories);
        }
        let mut seen = BTreeSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ProfileError::DuplicatePriorityCategory {
                    category: label.clone(),
                });
            }
        }
        Ok(Self(labels))
    }

    /// Number of priority categories (the reduced dimensionality).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in dimension order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Priority labels that no venue in `vocabulary` carries.
    ///
    /// These reduce to 0.0 for every district; callers may want to warn
    /// about them since they often indicate a label spelling mismatch.
    #[must_use]
    pub fn unmatched<'a>(&'a self, vocabulary: &CategoryVocabulary) -> Vec<&'a str> {
        self.0
            .iter()
            .map(String::as_str)
            .filter(|label| !vocabulary.contains(label))
            .collect()
    }
}

impl Default for PriorityCategories {
    fn default() -> Self {
        Self(
            DEFAULT_PRIORITY_CATEGORIES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        )
    }
}

impl TryFrom<Vec<String>> for PriorityCategories {
    type Error = ProfileError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<PriorityCategories> for Vec<String> {
    fn from(categories: PriorityCategories) -> Self {
        categories.0
    }
}

/// A district's frequencies restricted to the priority categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReducedProfile(Vec<f64>);

impl ReducedProfile {
    /// Entries in priority order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the profile, returning its entries.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Combined share of nearby venues that are priority amenities.
    #[must_use]
    pub fn priority_share(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Reduces a full profile to one entry per priority category.
///
/// A category the district never observed yields 0.0.
#[must_use]
pub fn reduce(profile: &DistrictProfile, priorities: &PriorityCategories) -> ReducedProfile {
    ReducedProfile(
        priorities
            .labels()
            .iter()
            .map(|label| profile.frequency(label))
            .collect(),
    )
}
