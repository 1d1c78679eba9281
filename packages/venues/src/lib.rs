#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nearby venue lookup for district enrichment.
//!
//! The pipeline only sees the [`VenueFetcher`] trait. Two implementations
//! are provided:
//!
//! 1. [`foursquare::FoursquareFetcher`]: live lookups against the
//!    Foursquare `venues/explore` endpoint, configured by the embedded
//!    [`service`] definition, with credentials from the environment.
//! 2. [`cache::CachedVenues`]: a JSON file of previously fetched venues
//!    keyed by district name, for offline reruns.

pub mod cache;
pub mod foursquare;
pub mod retry;
pub mod service;

use amenity_map_district_models::{District, Venue};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching venues.
#[derive(Debug, Error)]
pub enum VenueError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The service answered with an error payload or unexpected shape.
    #[error("Response error: {message}")]
    Response {
        /// Description of what went wrong.
        message: String,
    },

    /// A required credential environment variable is not set.
    #[error("Missing credential: environment variable {var} is not set")]
    MissingCredentials {
        /// Name of the missing variable.
        var: String,
    },

    /// The cache has no entry for the requested district.
    #[error("No cached venues for district '{district}'")]
    NotCached {
        /// The requested district name.
        district: String,
    },
}

/// A bounded nearby-venue request for one district.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// District the request is made for (used for logging and caching).
    pub district: String,
    /// Centre latitude.
    pub latitude: f64,
    /// Centre longitude.
    pub longitude: f64,
    /// Search radius in metres.
    pub radius_meters: u32,
    /// Maximum number of venues to return.
    pub limit: u32,
}

impl NearbyQuery {
    /// Builds a query centred on a district.
    #[must_use]
    pub fn for_district(district: &District, radius_meters: u32, limit: u32) -> Self {
        Self {
            district: district.name.clone(),
            latitude: district.latitude,
            longitude: district.longitude,
            radius_meters,
            limit,
        }
    }
}

/// Trait that all venue sources must implement.
///
/// Implementations return at most `query.limit` venues. An empty list is
/// a valid answer (a district with no nearby amenities).
#[async_trait]
pub trait VenueFetcher: Send + Sync {
    /// Returns a short identifier for this fetcher (e.g., `"foursquare"`).
    fn id(&self) -> &str;

    /// Fetches venues near the query coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError`] if the lookup fails.
    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Venue>, VenueError>;
}
