//! Ranked district table.
//!
//! Districts are ordered by the sum of their reduced vector (the share of
//! nearby venues that are priority amenities), highest first, ties broken
//! by name.

use std::fmt::Write as _;

use amenity_map_pipeline::CityAnalysis;
use serde::Serialize;

/// Number of most common categories listed per district.
pub const TOP_CATEGORY_COUNT: usize = 3;

/// One row of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow<'a> {
    /// 1-based rank.
    pub rank: usize,
    /// District name.
    pub district: &'a str,
    /// District postal code.
    pub postal_code: &'a str,
    /// Cluster label.
    pub cluster: usize,
    /// Priority frequencies in priority order.
    pub frequencies: &'a [f64],
    /// Sum of `frequencies`.
    pub priority_share: f64,
    /// Most common categories overall (not only priority ones).
    pub top_categories: Vec<&'a str>,
}

/// Builds the ranked rows of an analysis.
#[must_use]
pub fn ranked_rows(analysis: &CityAnalysis) -> Vec<RankedRow<'_>> {
    let mut rows: Vec<RankedRow<'_>> = analysis
        .districts
        .iter()
        .map(|result| RankedRow {
            rank: 0,
            district: &result.district.name,
            postal_code: &result.district.postal_code,
            cluster: result.cluster,
            frequencies: result.reduced.as_slice(),
            priority_share: result.reduced.priority_share(),
            top_categories: result
                .profile
                .top_categories(TOP_CATEGORY_COUNT)
                .into_iter()
                .map(|(label, _)| label)
                .collect(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.priority_share
            .total_cmp(&a.priority_share)
            .then_with(|| a.district.cmp(b.district))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }
    rows
}

/// Renders the ranked table as aligned plain text.
#[must_use]
pub fn render_ranked_table(analysis: &CityAnalysis) -> String {
    let rows = ranked_rows(analysis);
    let labels = analysis.priority_categories.labels();

    let name_width = rows
        .iter()
        .map(|r| r.district.chars().count())
        .chain(std::iter::once("District".len()))
        .max()
        .unwrap_or(0);
    let code_width = rows
        .iter()
        .map(|r| r.postal_code.chars().count())
        .chain(std::iter::once("Post".len()))
        .max()
        .unwrap_or(0);
    let column_widths: Vec<usize> = labels.iter().map(|l| l.chars().count().max(5)).collect();

    let mut out = String::new();
    let _ = write!(
        out,
        "{:>4}  {:<name_width$}  {:<code_width$}  {:>7}",
        "Rank", "District", "Post", "Cluster"
    );
    for (label, width) in labels.iter().zip(&column_widths) {
        let _ = write!(out, "  {label:>width$}");
    }
    let _ = writeln!(out, "  {:>5}  Top venues", "Share");

    for row in &rows {
        let _ = write!(
            out,
            "{:>4}  {:<name_width$}  {:<code_width$}  {:>7}",
            row.rank, row.district, row.postal_code, row.cluster
        );
        for (value, width) in row.frequencies.iter().zip(&column_widths) {
            let _ = write!(out, "  {value:>width$.3}");
        }
        let _ = writeln!(
            out,
            "  {:>5.3}  {}",
            row.priority_share,
            row.top_categories.join(", ")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::toy_analysis;

    #[test]
    fn ranks_by_priority_share_descending() {
        let analysis = toy_analysis();
        let rows = ranked_rows(&analysis);

        let order: Vec<&str> = rows.iter().map(|r| r.district).collect();
        assert_eq!(order, vec!["Alpha", "Bravo", "Charlie"]);
        assert_eq!(
            rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!((rows[0].priority_share - 1.0).abs() < 1e-9);
        assert!((rows[1].priority_share - 0.5).abs() < 1e-9);
        assert!(rows[2].priority_share.abs() < 1e-9);
    }

    #[test]
    fn ties_are_broken_by_name() {
        let mut analysis = toy_analysis();
        analysis.districts[1].reduced = analysis.districts[2].reduced.clone();
        analysis.districts[1].district.name = "Delta".to_string();
        let rows = ranked_rows(&analysis);
        let order: Vec<&str> = rows.iter().map(|r| r.district).collect();
        assert_eq!(order, vec!["Alpha", "Charlie", "Delta"]);
    }

    #[test]
    fn top_categories_include_non_priority_venues() {
        let analysis = toy_analysis();
        let rows = ranked_rows(&analysis);
        assert_eq!(rows[0].top_categories, vec!["Café", "Park"]);
        assert_eq!(rows[1].top_categories, vec!["Gym", "Park"]);
        assert!(rows[2].top_categories.is_empty());
    }

    #[test]
    fn table_has_header_and_one_line_per_district() {
        let analysis = toy_analysis();
        let table = render_ranked_table(&analysis);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Café"));
        assert!(lines[0].contains("Park"));
        assert!(lines[1].contains("Alpha"));
        assert!(lines[1].contains("0.667"));
        assert!(lines[3].contains("Charlie"));
    }
}
