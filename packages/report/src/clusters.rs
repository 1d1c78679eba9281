//! Per-cluster tables.

use std::fmt::Write as _;

use amenity_map_pipeline::CityAnalysis;
use serde::Serialize;

/// Members and mean reduced vector of one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary<'a> {
    /// Cluster label.
    pub label: usize,
    /// Member district names in seed order.
    pub members: Vec<&'a str>,
    /// Mean of the members' reduced vectors, in priority order.
    pub mean: Vec<f64>,
}

/// Summarizes every cluster of an analysis, in label order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_summaries(analysis: &CityAnalysis) -> Vec<ClusterSummary<'_>> {
    let dimension = analysis.priority_categories.len();

    (0..analysis.clustering.clusters)
        .map(|label| {
            let mut members = Vec::new();
            let mut sum = vec![0.0; dimension];
            for result in analysis.members(label) {
                members.push(result.district.name.as_str());
                for (total, value) in sum.iter_mut().zip(result.reduced.as_slice()) {
                    *total += value;
                }
            }
            let mean = if members.is_empty() {
                sum
            } else {
                let n = members.len() as f64;
                sum.into_iter().map(|total| total / n).collect()
            };
            ClusterSummary {
                label,
                members,
                mean,
            }
        })
        .collect()
}

/// Renders one block per cluster: a header with the mean vector, then the
/// member districts with their own vectors.
#[must_use]
pub fn render_cluster_tables(analysis: &CityAnalysis) -> String {
    let labels = analysis.priority_categories.labels();
    let mut out = String::new();

    for summary in cluster_summaries(analysis) {
        let _ = writeln!(
            out,
            "Cluster {} ({} districts)",
            summary.label,
            summary.members.len()
        );
        let _ = writeln!(out, "  mean: {}", format_vector(labels, &summary.mean));
        for result in analysis.members(summary.label) {
            let _ = writeln!(
                out,
                "  - {} ({}): {}",
                result.district.name,
                result.district.postal_code,
                format_vector(labels, result.reduced.as_slice())
            );
        }
        out.push('\n');
    }
    out
}

fn format_vector(labels: &[String], values: &[f64]) -> String {
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| format!("{label}={value:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}
