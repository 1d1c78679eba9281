//! Clustering parameters.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What to do when fewer districts than clusters are supplied.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClusterCountPolicy {
    /// Fail with a configuration error.
    #[default]
    Strict,
    /// Lower k to the number of districts and report it.
    Reduce,
}

/// Parameters for one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KMeansParams {
    /// Requested number of clusters.
    pub clusters: usize,
    /// Random seed; `None` draws a fresh one.
    pub seed: Option<u64>,
    /// Behaviour when `clusters` exceeds the number of districts.
    pub policy: ClusterCountPolicy,
    /// Lloyd iteration cap per restart.
    pub max_iterations: usize,
    /// Convergence threshold on the largest squared centroid shift.
    pub tolerance: f64,
    /// Number of independent k-means++ restarts; the lowest inertia wins.
    pub restarts: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            clusters: 5,
            seed: None,
            policy: ClusterCountPolicy::Strict,
            max_iterations: 300,
            tolerance: 1e-6,
            restarts: 10,
        }
    }
}

impl KMeansParams {
    /// Parameters with `clusters` and defaults for everything else.
    #[must_use]
    pub fn with_clusters(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
        }
    }

    /// Fixes the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the cluster count policy.
    #[must_use]
    pub const fn policy(mut self, policy: ClusterCountPolicy) -> Self {
        self.policy = policy;
        self
    }
}
