#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seeded k-means partitioning of district amenity vectors.
//!
//! [`cluster`] takes one fixed-dimension vector per district and assigns
//! each a label in `[0, k)` using k-means++ seeding, Lloyd iterations and
//! squared Euclidean distance, keeping the best of several restarts.
//!
//! Runs are reproducible: the random generator is a `ChaCha8Rng` seeded
//! from [`KMeansParams::seed`], and when no seed is given the freshly
//! drawn one is logged and reported in [`ClusterOutcome::seed`]. Labels
//! are canonicalized by first appearance, so equal partitions always carry
//! equal labels.

pub mod kmeans;
pub mod outcome;
pub mod params;

pub use kmeans::cluster;
pub use outcome::ClusterOutcome;
pub use params::{ClusterCountPolicy, KMeansParams};

use thiserror::Error;

/// Errors that halt a clustering run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// The requested cluster count is zero.
    #[error("Cluster count must be at least 1")]
    InvalidClusterCount,

    /// More clusters were requested than there are points, under the
    /// strict policy.
    #[error(
        "Requested {requested} clusters but only {available} districts are available \
         (use the `reduce` cluster count policy to lower k automatically)"
    )]
    TooFewPoints {
        /// Requested k.
        requested: usize,
        /// Number of input vectors.
        available: usize,
    },

    /// No vectors were supplied.
    #[error("No districts to cluster")]
    NoPoints,

    /// Vectors have zero dimensions.
    #[error("Vectors have no dimensions")]
    ZeroDimension,

    /// A vector's length differs from the first vector's.
    #[error("Vector {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending vector.
        index: usize,
        /// Dimensionality of the first vector.
        expected: usize,
        /// Dimensionality of the offending vector.
        found: usize,
    },

    /// A vector holds NaN or an infinity.
    #[error("Vector {index} contains a non-finite value")]
    NonFinite {
        /// Position of the offending vector.
        index: usize,
    },
}
