#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report assembly for a [`CityAnalysis`].
//!
//! Joins cluster labels back onto district metadata and renders:
//!
//! - [`ranked`]: districts ordered by their share of priority amenities
//! - [`clusters`]: one table per cluster with the mean reduced vector
//! - [`map`]: a `GeoJSON` point layer coloured by cluster
//!
//! [`CityAnalysis`]: amenity_map_pipeline::CityAnalysis

pub mod clusters;
pub mod map;
pub mod ranked;

use std::path::Path;

use amenity_map_pipeline::CityAnalysis;
use thiserror::Error;

/// Errors that can occur while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// File write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the full analysis (districts, vectors, labels, diagnostics) as
/// pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the write fails.
pub fn write_analysis_json(analysis: &CityAnalysis, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(analysis)?;
    std::fs::write(path, json)?;
    log::info!("Wrote analysis for {} to {}", analysis.city, path.display());
    Ok(())
}

/// Writes the cluster map layer as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the write fails.
pub fn write_geojson(analysis: &CityAnalysis, path: &Path) -> Result<(), ReportError> {
    let collection = map::feature_collection(analysis);
    let json = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, json)?;
    log::info!(
        "Wrote {} map features for {} to {}",
        collection.features.len(),
        analysis.city,
        path.display()
    );
    Ok(())
}
