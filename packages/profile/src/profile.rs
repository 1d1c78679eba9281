//! Profile builder: venue lists to category frequencies.
//!
//! A [`DistrictProfile`] keeps raw counts and the district's total venue
//! count; frequencies are derived on demand as `count / total`. A district
//! without venues has total zero and every frequency is defined as 0.0.

use std::collections::BTreeMap;

use amenity_map_district_models::Venue;
use serde::Serialize;

use crate::vocabulary::CategoryVocabulary;

/// Category counts for one district.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictProfile {
    total_venues: u64,
    counts: BTreeMap<String, u64>,
}

/// Builds the profile of one district from its venues.
///
/// Labels are counted exactly as the service returned them.
#[must_use]
pub fn build_profile(venues: &[Venue]) -> DistrictProfile {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for venue in venues {
        *counts.entry(venue.category.clone()).or_default() += 1;
    }

    DistrictProfile {
        total_venues: venues.len() as u64,
        counts,
    }
}

impl DistrictProfile {
    /// Number of venues the profile was built from.
    #[must_use]
    pub const fn total_venues(&self) -> u64 {
        self.total_venues
    }

    /// Returns `true` if the district had no venues.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_venues == 0
    }

    /// Occurrences of `label`.
    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Per-category counts, keyed by label.
    #[must_use]
    pub const fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Share of this district's venues carrying `label`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frequency(&self, label: &str) -> f64 {
        if self.total_venues == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total_venues as f64
    }

    /// Frequencies aligned to `vocabulary`, one entry per label.
    ///
    /// Labels the district never observed are 0.0.
    #[must_use]
    pub fn aligned(&self, vocabulary: &CategoryVocabulary) -> Vec<f64> {
        vocabulary
            .labels()
            .iter()
            .map(|label| self.frequency(label))
            .collect()
    }

    /// The `n` most common categories, most frequent first.
    ///
    /// Ties are broken by label so the order is reproducible.
    #[must_use]
    pub fn top_categories(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Profiles for every district of a city, aligned to one vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityProfiles {
    /// Categories observed anywhere in the city.
    pub vocabulary: CategoryVocabulary,
    /// One profile per district, in input order.
    pub profiles: Vec<DistrictProfile>,
}

/// Builds profiles for all districts of a city.
///
/// `venue_lists[i]` are the venues of district `i`; the output keeps
/// that order.
#[must_use]
pub fn build_city_profiles(venue_lists: &[Vec<Venue>]) -> CityProfiles {
    let vocabulary = CategoryVocabulary::from_venue_lists(venue_lists.iter().map(Vec::as_slice));
    let profiles = venue_lists.iter().map(|v| build_profile(v)).collect();

    CityProfiles {
        vocabulary,
        profiles,
    }
}

impl CityProfiles {
    /// One row per district, one column per vocabulary label.
    #[must_use]
    pub fn frequency_matrix(&self) -> Vec<Vec<f64>> {
        self.profiles
            .iter()
            .map(|profile| profile.aligned(&self.vocabulary))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn venues(categories: &[&str]) -> Vec<Venue> {
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| Venue::new(format!("venue {i}"), 46.0, 14.5, *c))
            .collect()
    }

    #[test]
    fn empty_venue_list_gives_zero_profile() {
        let profile = build_profile(&[]);
        assert!(profile.is_empty());
        assert_eq!(profile.total_venues(), 0);
        assert!(profile.frequency("Café").abs() < f64::EPSILON);
        assert!(profile.counts().is_empty());
    }

    #[test]
    fn frequencies_sum_to_one() {
        let list = venues(&["Café", "Café", "Park", "Gym", "Bakery", "Café", "Park"]);
        let profile = build_profile(&list);
        let total: f64 = profile
            .counts()
            .keys()
            .map(|label| profile.frequency(label))
            .sum();
        assert!((total - 1.0).abs() < TOLERANCE);
        assert!((profile.frequency("Café") - 3.0 / 7.0).abs() < TOLERANCE);
    }

    #[test]
    fn labels_are_not_folded() {
        let profile = build_profile(&venues(&["Café", "café", "Cafe"]));
        assert_eq!(profile.counts().len(), 3);
        assert_eq!(profile.count("Café"), 1);
    }

    #[test]
    fn aligned_vectors_fill_absent_categories_with_zero() {
        let lists = vec![venues(&["Café", "Café", "Park"]), venues(&["Gym"]), vec![]];
        let city = build_city_profiles(&lists);
        let matrix = city.frequency_matrix();

        assert_eq!(city.vocabulary.labels(), ["Café", "Gym", "Park"]);
        assert_eq!(matrix.len(), 3);
        for row in &matrix {
            assert_eq!(row.len(), 3);
        }
        assert!((matrix[0][0] - 2.0 / 3.0).abs() < TOLERANCE);
        assert!(matrix[0][1].abs() < TOLERANCE);
        assert!((matrix[1][1] - 1.0).abs() < TOLERANCE);
        assert!(matrix[2].iter().all(|f| f.abs() < TOLERANCE));
    }

    #[test]
    fn non_empty_rows_sum_to_one() {
        let lists = vec![
            venues(&["Café", "Park", "Restaurant", "Restaurant"]),
            venues(&["Supermarket"]),
        ];
        for row in build_city_profiles(&lists).frequency_matrix() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn top_categories_rank_by_count_then_label() {
        let profile = build_profile(&venues(&["Park", "Café", "Park", "Bar", "Café", "Gym"]));
        assert_eq!(
            profile.top_categories(3),
            vec![("Café", 2), ("Park", 2), ("Bar", 1)]
        );
        assert!(build_profile(&[]).top_categories(3).is_empty());
    }
}
