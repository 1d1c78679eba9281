#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District, venue, and city definition types.
//!
//! Defines the TOML schema for embedded city definitions and the plain
//! data types that flow through the amenity pipeline. Everything here is
//! immutable once constructed; downstream stages borrow these values.

use serde::{Deserialize, Serialize};

/// A named district within a city, the unit of analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    /// District name (e.g., "Bežigrad").
    pub name: String,
    /// Postal code as written locally (kept as a string, e.g. "1000").
    pub postal_code: String,
    /// Representative latitude (WGS84).
    pub latitude: f64,
    /// Representative longitude (WGS84).
    pub longitude: f64,
}

impl District {
    /// Creates a district from its seed fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            postal_code: postal_code.into(),
            latitude,
            longitude,
        }
    }
}

/// A single point-of-interest returned by the places-lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    /// Venue name.
    pub name: String,
    /// Venue latitude (WGS84).
    pub latitude: f64,
    /// Venue longitude (WGS84).
    pub longitude: f64,
    /// Category label exactly as returned by the service (e.g., "Café").
    pub category: String,
}

impl Venue {
    /// Creates a venue.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            category: category.into(),
        }
    }
}

/// A city definition, deserialized from an embedded TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDefinition {
    /// Unique identifier (e.g., `"ljubljana"`).
    pub id: String,
    /// Human-readable name (e.g., "Ljubljana").
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Curated district list.
    pub districts: Vec<SeedRow>,
}

impl CityDefinition {
    /// Returns the city's districts as [`District`] values.
    #[must_use]
    pub fn districts(&self) -> Vec<District> {
        self.districts.iter().cloned().map(District::from).collect()
    }
}

/// One row of a seed list, as found in CSV files and city TOML files.
///
/// Column names follow the curated CSV (`district`, `post_code`,
/// `latitude`, `longitude`, optional `city`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRow {
    /// City the district belongs to, when the file covers several cities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// District name.
    #[serde(alias = "district_name", alias = "name")]
    pub district: String,
    /// Postal code.
    #[serde(alias = "postal_code")]
    pub post_code: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl From<SeedRow> for District {
    fn from(row: SeedRow) -> Self {
        Self {
            name: row.district,
            postal_code: row.post_code,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_row_accepts_alternate_column_names() {
        let row: SeedRow = serde_json::from_value(serde_json::json!({
            "district_name": "Center",
            "postal_code": "1000",
            "latitude": 46.05,
            "longitude": 14.5
        }))
        .unwrap();
        assert_eq!(row.district, "Center");
        assert_eq!(row.post_code, "1000");
        assert!(row.city.is_none());
    }

    #[test]
    fn seed_row_converts_to_district() {
        let row = SeedRow {
            city: Some("Graz".to_string()),
            district: "Lend".to_string(),
            post_code: "8020".to_string(),
            latitude: 47.07,
            longitude: 15.43,
        };
        let district = District::from(row);
        assert_eq!(district, District::new("Lend", "8020", 47.07, 15.43));
    }
}
