//! Pipeline configuration.
//!
//! Defaults are embedded from `config/default.toml`. A user file only
//! needs the keys it changes: its top-level keys replace the defaults
//! before the merged table is deserialized and validated.

use std::path::Path;

use amenity_map_cluster::{ClusterCountPolicy, ClusterError, KMeansParams};
use amenity_map_profile::PriorityCategories;
use serde::{Deserialize, Serialize};

use crate::PipelineError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Parameters for one city run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Ordered categories of interest; defines the reduced dimensions.
    pub priority_categories: PriorityCategories,
    /// Number of clusters (k).
    pub clusters: usize,
    /// Clustering seed; omitted means a fresh seed per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// What to do when a city has fewer districts than `clusters`.
    pub cluster_count_policy: ClusterCountPolicy,
    /// Venue search radius in metres.
    pub radius_meters: u32,
    /// Maximum venues per district.
    pub venue_limit: u32,
    /// Lloyd iteration cap per restart.
    pub max_iterations: usize,
    /// Convergence threshold on the squared centroid shift.
    pub tolerance: f64,
    /// Number of k-means++ restarts.
    pub restarts: usize,
}

impl Default for PipelineConfig {
    /// # Panics
    ///
    /// Panics if the embedded default TOML is malformed (caught by tests).
    fn default() -> Self {
        toml::de::from_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }
}

impl PipelineConfig {
    /// Parses a (possibly partial) TOML document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if either document fails to parse, a key
    /// is unknown, or the merged values are invalid.
    pub fn from_toml_str(overrides: &str) -> Result<Self, PipelineError> {
        let mut merged: toml::Table = toml::de::from_str(DEFAULT_CONFIG_TOML)?;
        let user: toml::Table = toml::de::from_str(overrides)?;
        for (key, value) in user {
            merged.insert(key, value);
        }

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a user configuration file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        log::info!("Loading pipeline config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] for a zero cluster count, radius, venue
    /// limit or restart count, or a negative or non-finite tolerance.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.clusters == 0 {
            return Err(ClusterError::InvalidClusterCount.into());
        }
        let invalid = |message: &str| {
            Err(PipelineError::Config {
                message: message.to_string(),
            })
        };
        if self.radius_meters == 0 {
            return invalid("radius_meters must be positive");
        }
        if self.venue_limit == 0 {
            return invalid("venue_limit must be positive");
        }
        if self.restarts == 0 {
            return invalid("restarts must be at least 1");
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return invalid("tolerance must be a finite, non-negative number");
        }
        Ok(())
    }

    /// Clustering parameters derived from this configuration.
    #[must_use]
    pub fn kmeans_params(&self) -> KMeansParams {
        KMeansParams {
            clusters: self.clusters,
            seed: self.seed,
            policy: self.cluster_count_policy,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            restarts: self.restarts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_reference_analysis() {
        let config = PipelineConfig::default();
        assert_eq!(config.priority_categories, PriorityCategories::default());
        assert_eq!(config.clusters, 5);
        assert_eq!(config.radius_meters, 1000);
        assert_eq!(config.venue_limit, 100);
        assert_eq!(config.cluster_count_policy, ClusterCountPolicy::Strict);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            "clusters = 3\nseed = 7\npriority_categories = [\"Café\", \"Park\"]\n",
        )
        .unwrap();
        assert_eq!(config.clusters, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.priority_categories.labels(), ["Café", "Park"]);
        assert_eq!(config.radius_meters, 1000);
    }

    #[test]
    fn empty_priority_list_is_rejected() {
        let err = PipelineConfig::from_toml_str("priority_categories = []\n").unwrap_err();
        assert!(matches!(err, PipelineError::ConfigParse(_)));
    }

    #[test]
    fn zero_clusters_is_rejected() {
        let err = PipelineConfig::from_toml_str("clusters = 0\n").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Cluster(ClusterError::InvalidClusterCount)
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PipelineConfig::from_toml_str("clusterz = 4\n").is_err());
    }

    #[test]
    fn reduce_policy_parses() {
        let config = PipelineConfig::from_toml_str("cluster_count_policy = \"reduce\"\n").unwrap();
        assert_eq!(config.kmeans_params().policy, ClusterCountPolicy::Reduce);
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join("amenity_map_config_test.toml");
        std::fs::write(&path, "venue_limit = 50\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.venue_limit, 50);

        let _ = std::fs::remove_file(&path);
    }
}
