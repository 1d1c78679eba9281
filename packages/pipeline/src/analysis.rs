//! Pure analysis step: venues in, labeled districts out.

use amenity_map_cluster::{ClusterOutcome, cluster};
use amenity_map_district_models::{District, Venue};
use amenity_map_profile::{
    CategoryVocabulary, DistrictProfile, PriorityCategories, ReducedProfile, build_city_profiles,
    reduce,
};
use serde::Serialize;

use crate::{PipelineError, config::PipelineConfig};

/// One district with its cluster label and profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResult {
    /// The seed-list district.
    pub district: District,
    /// Cluster label in `[0, clustering.clusters)`.
    pub cluster: usize,
    /// Frequencies of the priority categories, in priority order.
    pub reduced: ReducedProfile,
    /// Full category counts of the district.
    pub profile: DistrictProfile,
}

/// Result of analyzing one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAnalysis {
    /// Display name of the city.
    pub city: String,
    /// Priority categories that define the reduced dimensions.
    pub priority_categories: PriorityCategories,
    /// Every category observed in the city.
    pub vocabulary: CategoryVocabulary,
    /// Districts in seed order.
    pub districts: Vec<DistrictResult>,
    /// Clustering diagnostics (seed, effective k, centroids, inertia).
    pub clustering: ClusterOutcome,
}

impl CityAnalysis {
    /// Districts carrying `label`, in seed order.
    pub fn members(&self, label: usize) -> impl Iterator<Item = &DistrictResult> {
        self.districts.iter().filter(move |d| d.cluster == label)
    }
}

/// Profiles, reduces and clusters one city's districts.
///
/// `venue_lists[i]` must hold the venues of `districts[i]`. Empty venue
/// lists are valid and produce all-zero vectors.
///
/// # Errors
///
/// Returns [`PipelineError::InputMismatch`] if the two slices differ in
/// length, or [`PipelineError::Cluster`] if clustering is impossible
/// (no districts, or k above the district count under the strict policy).
pub fn analyze_city(
    city: &str,
    districts: &[District],
    venue_lists: &[Vec<Venue>],
    config: &PipelineConfig,
) -> Result<CityAnalysis, PipelineError> {
    if districts.len() != venue_lists.len() {
        return Err(PipelineError::InputMismatch {
            districts: districts.len(),
            venue_lists: venue_lists.len(),
        });
    }

    let profiles = build_city_profiles(venue_lists);
    log::info!(
        "{city}: {} districts, {} venues, {} distinct categories",
        districts.len(),
        venue_lists.iter().map(Vec::len).sum::<usize>(),
        profiles.vocabulary.len()
    );

    let priorities = &config.priority_categories;
    let unmatched = priorities.unmatched(&profiles.vocabulary);
    if !unmatched.is_empty() {
        log::warn!(
            "{city}: priority categories never observed: {}",
            unmatched.join(", ")
        );
    }

    let reduced: Vec<ReducedProfile> = profiles
        .profiles
        .iter()
        .map(|profile| reduce(profile, priorities))
        .collect();
    for (district, vector) in districts.iter().zip(&reduced) {
        log::debug!("{city}: {} -> {:?}", district.name, vector.as_slice());
    }

    let points: Vec<Vec<f64>> = reduced.iter().map(|r| r.as_slice().to_vec()).collect();
    let clustering = cluster(&points, &config.kmeans_params())?;
    log::info!(
        "{city}: {} clusters (seed {}, inertia {:.6})",
        clustering.clusters,
        clustering.seed,
        clustering.inertia
    );

    let results = districts
        .iter()
        .zip(reduced)
        .zip(profiles.profiles)
        .zip(&clustering.labels)
        .map(|(((district, reduced), profile), &label)| DistrictResult {
            district: district.clone(),
            cluster: label,
            reduced,
            profile,
        })
        .collect();

    Ok(CityAnalysis {
        city: city.to_string(),
        priority_categories: priorities.clone(),
        vocabulary: profiles.vocabulary,
        districts: results,
        clustering,
    })
}
