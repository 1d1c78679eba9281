//! Result of a clustering run.

use serde::Serialize;

/// Labels and diagnostics of the winning k-means restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutcome {
    /// One label per input vector, in input order, in `[0, clusters)`.
    pub labels: Vec<usize>,
    /// The k that was asked for.
    pub requested_clusters: usize,
    /// The k that was used (lower than requested only under the
    /// `reduce` policy).
    pub clusters: usize,
    /// Centroid of each cluster, indexed by label.
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each vector to its centroid.
    pub inertia: f64,
    /// Lloyd iterations of the winning restart.
    pub iterations: usize,
    /// Seed the run was driven by.
    pub seed: u64,
}

impl ClusterOutcome {
    /// Returns `true` if k was lowered to fit the input.
    #[must_use]
    pub const fn was_reduced(&self) -> bool {
        self.clusters < self.requested_clusters
    }

    /// Input indices grouped by label.
    #[must_use]
    pub fn partition(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.clusters];
        for (index, &label) in self.labels.iter().enumerate() {
            groups[label].push(index);
        }
        groups
    }

    /// Number of members per label.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.clusters];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Returns `true` if both outcomes group the same inputs together,
    /// regardless of label numbering.
    #[must_use]
    pub fn same_partition(&self, other: &Self) -> bool {
        if self.labels.len() != other.labels.len() {
            return false;
        }
        let mut mine = self.partition();
        let mut theirs = other.partition();
        mine.sort();
        theirs.sort();
        mine == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(labels: Vec<usize>, clusters: usize) -> ClusterOutcome {
        ClusterOutcome {
            labels,
            requested_clusters: clusters,
            clusters,
            centroids: vec![vec![0.0]; clusters],
            inertia: 0.0,
            iterations: 1,
            seed: 0,
        }
    }

    #[test]
    fn partition_groups_indices_by_label() {
        let o = outcome(vec![0, 1, 1, 0, 2], 3);
        assert_eq!(o.partition(), vec![vec![0, 3], vec![1, 2], vec![4]]);
        assert_eq!(o.sizes(), vec![2, 2, 1]);
    }

    #[test]
    fn same_partition_ignores_label_numbers() {
        let a = outcome(vec![0, 1, 1], 2);
        let b = outcome(vec![1, 0, 0], 2);
        let c = outcome(vec![0, 0, 1], 2);
        assert!(a.same_partition(&b));
        assert!(!a.same_partition(&c));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut o = outcome(vec![0, 1, 1], 2);
        o.requested_clusters = 5;
        o.seed = 99;

        let value = serde_json::to_value(&o).unwrap();
        assert_eq!(value["labels"], serde_json::json!([0, 1, 1]));
        assert_eq!(value["requestedClusters"], 5);
        assert_eq!(value["clusters"], 2);
        assert_eq!(value["seed"], 99);
        assert!(value.get("requested_clusters").is_none());
    }
}
