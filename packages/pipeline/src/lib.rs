#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-city amenity pipeline.
//!
//! One parameterized run per city: districts in, labeled districts out.
//!
//! 1. [`run::fetch_city_venues`] asks a [`VenueFetcher`] for each
//!    district's nearby venues, one district at a time.
//! 2. [`analysis::analyze_city`] builds the city's profiles, reduces them
//!    to the priority categories and clusters the reduced vectors.
//!
//! [`run::run_city`] chains both. The analysis step is pure and can be
//! fed venues from any source (live fetcher, cache file, tests).
//!
//! [`VenueFetcher`]: amenity_map_venues::VenueFetcher

pub mod analysis;
pub mod config;
pub mod progress;
pub mod run;

pub use analysis::{CityAnalysis, DistrictResult, analyze_city};
pub use config::PipelineConfig;
pub use run::{fetch_city_venues, run_city};

use amenity_map_cluster::ClusterError;
use amenity_map_profile::ProfileError;
use amenity_map_venues::VenueError;
use thiserror::Error;

/// Errors that fail a city run. No partial results are produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are invalid.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Priority category configuration is invalid.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Clustering failed or was misconfigured.
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// Venue lookup failed for a district.
    #[error("Venue fetch failed for district '{district}': {source}")]
    Fetch {
        /// District whose lookup failed.
        district: String,
        /// Underlying fetcher error.
        #[source]
        source: VenueError,
    },

    /// District and venue lists do not line up.
    #[error("Got venue lists for {venue_lists} districts but {districts} districts were given")]
    InputMismatch {
        /// Number of districts.
        districts: usize,
        /// Number of venue lists.
        venue_lists: usize,
    },
}
