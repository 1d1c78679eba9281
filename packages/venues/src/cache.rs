//! Venue cache file.
//!
//! Stores previously fetched venues keyed by district name so a city can
//! be re-analyzed (different k, seed or priority list) without hitting
//! the places service again. The file records the radius and limit it
//! was fetched with; lookups with a smaller limit are truncated.

use std::collections::BTreeMap;
use std::path::Path;

use amenity_map_district_models::Venue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{NearbyQuery, VenueError, VenueFetcher};

/// Venues for every district of one city, as written by `fetch`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedVenues {
    /// Search radius the venues were fetched with.
    pub radius_meters: u32,
    /// Per-district limit the venues were fetched with.
    pub limit: u32,
    /// District name -> venues.
    pub districts: BTreeMap<String, Vec<Venue>>,
}

impl CachedVenues {
    /// Creates an empty cache for the given fetch parameters.
    #[must_use]
    pub const fn new(radius_meters: u32, limit: u32) -> Self {
        Self {
            radius_meters,
            limit,
            districts: BTreeMap::new(),
        }
    }

    /// Records the venues fetched for a district, replacing any previous
    /// entry.
    pub fn insert(&mut self, district: impl Into<String>, venues: Vec<Venue>) {
        self.districts.insert(district.into(), venues);
    }

    /// Total number of cached venues across all districts.
    #[must_use]
    pub fn venue_count(&self) -> usize {
        self.districts.values().map(Vec::len).sum()
    }

    /// Reads a cache file.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, VenueError> {
        let text = std::fs::read_to_string(path)?;
        let cache: Self = serde_json::from_str(&text)?;
        log::info!(
            "Loaded {} cached venues for {} districts from {}",
            cache.venue_count(),
            cache.districts.len(),
            path.display()
        );
        Ok(cache)
    }

    /// Writes the cache as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), VenueError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Wrote {} venues to {}", self.venue_count(), path.display());
        Ok(())
    }
}

#[async_trait]
impl VenueFetcher for CachedVenues {
    fn id(&self) -> &str {
        "cache"
    }

    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Venue>, VenueError> {
        if query.radius_meters != self.radius_meters {
            log::warn!(
                "{}: cache was fetched with radius {}m, query asks for {}m",
                query.district,
                self.radius_meters,
                query.radius_meters
            );
        }

        let venues = self
            .districts
            .get(&query.district)
            .ok_or_else(|| VenueError::NotCached {
                district: query.district.clone(),
            })?;

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(venues.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(district: &str, limit: u32) -> NearbyQuery {
        NearbyQuery {
            district: district.to_string(),
            latitude: 46.0,
            longitude: 14.5,
            radius_meters: 1000,
            limit,
        }
    }

    fn sample() -> CachedVenues {
        let mut cache = CachedVenues::new(1000, 100);
        cache.insert(
            "Center",
            vec![
                Venue::new("Zvezda", 46.05, 14.50, "Café"),
                Venue::new("Tivoli", 46.05, 14.49, "Park"),
            ],
        );
        cache.insert("Rudnik", Vec::new());
        cache
    }

    #[tokio::test]
    async fn returns_cached_venues() {
        let venues = sample().fetch_nearby(&query("Center", 100)).await.unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].name, "Zvezda");
    }

    #[tokio::test]
    async fn truncates_to_query_limit() {
        let venues = sample().fetch_nearby(&query("Center", 1)).await.unwrap();
        assert_eq!(venues.len(), 1);
    }

    #[tokio::test]
    async fn empty_entry_is_not_an_error() {
        let venues = sample().fetch_nearby(&query("Rudnik", 100)).await.unwrap();
        assert!(venues.is_empty());
    }

    #[tokio::test]
    async fn unknown_district_is_reported() {
        let err = sample()
            .fetch_nearby(&query("Atlantis", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, VenueError::NotCached { district } if district == "Atlantis"));
    }

    #[test]
    fn save_and_load_preserve_contents() {
        let path = std::env::temp_dir().join("amenity_map_venue_cache_test.json");
        let cache = sample();
        cache.save(&path).unwrap();

        let loaded = CachedVenues::load(&path).unwrap();
        assert_eq!(loaded, cache);
        assert_eq!(loaded.venue_count(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
