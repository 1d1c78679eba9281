//! Fetch-then-analyze orchestration for one city.

use amenity_map_cluster::{ClusterCountPolicy, ClusterError};
use amenity_map_district_models::{District, Venue};
use amenity_map_venues::{NearbyQuery, VenueFetcher};

use crate::{
    PipelineError,
    analysis::{CityAnalysis, analyze_city},
    config::PipelineConfig,
    progress::ProgressCallback,
};

/// Fetches the venues of every district, one district at a time.
///
/// The returned lists are in district order. Any failed lookup fails the
/// whole fetch; no partial result is returned.
///
/// # Errors
///
/// Returns [`PipelineError::Fetch`] naming the first district whose
/// lookup failed.
pub async fn fetch_city_venues(
    districts: &[District],
    fetcher: &dyn VenueFetcher,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Vec<Venue>>, PipelineError> {
    log::info!(
        "Fetching venues for {} districts from {} (radius {} m, limit {})",
        districts.len(),
        fetcher.id(),
        config.radius_meters,
        config.venue_limit
    );
    progress.set_total(districts.len() as u64);

    let mut venue_lists = Vec::with_capacity(districts.len());
    for district in districts {
        progress.set_message(district.name.clone());
        let query = NearbyQuery::for_district(district, config.radius_meters, config.venue_limit);
        let venues = fetcher
            .fetch_nearby(&query)
            .await
            .map_err(|source| PipelineError::Fetch {
                district: district.name.clone(),
                source,
            })?;
        log::debug!("{}: {} venues", district.name, venues.len());
        venue_lists.push(venues);
        progress.inc(1);
    }

    let total: usize = venue_lists.iter().map(Vec::len).sum();
    progress.finish(format!("{total} venues"));
    Ok(venue_lists)
}

/// Runs the whole pipeline for one city.
///
/// Configuration problems that are knowable up front (invalid values, or
/// more clusters than districts under the strict policy) are reported
/// before any venue is fetched.
///
/// # Errors
///
/// Returns [`PipelineError`] if the configuration is invalid, a fetch
/// fails, or clustering fails.
pub async fn run_city(
    city: &str,
    districts: &[District],
    fetcher: &dyn VenueFetcher,
    config: &PipelineConfig,
    progress: &dyn ProgressCallback,
) -> Result<CityAnalysis, PipelineError> {
    config.validate()?;
    if districts.is_empty() {
        return Err(ClusterError::NoPoints.into());
    }
    if config.cluster_count_policy == ClusterCountPolicy::Strict && config.clusters > districts.len()
    {
        return Err(ClusterError::TooFewPoints {
            requested: config.clusters,
            available: districts.len(),
        }
        .into());
    }

    let venue_lists = fetch_city_venues(districts, fetcher, config, progress).await?;
    analyze_city(city, districts, &venue_lists, config)
}
