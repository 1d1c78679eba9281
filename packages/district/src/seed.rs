//! CSV seed list reader.
//!
//! Parses the curated district table (`district`, `post_code`,
//! `latitude`, `longitude`, optional `city`) into [`District`] values.
//! When the file covers several cities, rows are filtered by the `city`
//! column (case-insensitive).

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use amenity_map_district_models::{District, SeedRow};

use crate::SeedError;

/// Loads districts from a CSV file on disk.
///
/// # Errors
///
/// Returns [`SeedError`] if the file cannot be opened, a row fails to
/// parse, or a row holds invalid values.
pub fn load_seed_file(path: &Path, city: Option<&str>) -> Result<Vec<District>, SeedError> {
    log::info!("Reading seed list from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_seed_csv(file, city)
}

/// Parses districts from any CSV reader.
///
/// Rows whose `city` column does not match `city` are skipped. Rows
/// without a `city` column are always kept.
///
/// # Errors
///
/// Returns [`SeedError`] on malformed CSV, out-of-range coordinates,
/// empty district names, or duplicate district names.
pub fn read_seed_csv<R: Read>(reader: R, city: Option<&str>) -> Result<Vec<District>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<SeedRow>().enumerate() {
        let row = record?;
        let other_city = match (city, row.city.as_deref()) {
            (Some(wanted), Some(actual)) => !wanted.eq_ignore_ascii_case(actual),
            _ => false,
        };
        if other_city {
            continue;
        }
        validate_row(idx + 1, &row)?;
        rows.push(row);
    }

    let districts = into_districts(rows)?;
    log::info!("Loaded {} districts", districts.len());
    Ok(districts)
}

/// Converts seed rows into districts, rejecting duplicate names.
///
/// # Errors
///
/// Returns [`SeedError::DuplicateDistrict`] if a name repeats.
pub fn into_districts(rows: Vec<SeedRow>) -> Result<Vec<District>, SeedError> {
    let mut seen = BTreeSet::new();
    let mut districts = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.district.clone()) {
            return Err(SeedError::DuplicateDistrict { name: row.district });
        }
        districts.push(District::from(row));
    }
    Ok(districts)
}

fn validate_row(row_num: usize, row: &SeedRow) -> Result<(), SeedError> {
    let invalid = |message: String| SeedError::InvalidRow {
        row: row_num,
        message,
    };

    if row.district.trim().is_empty() {
        return Err(invalid("empty district name".to_string()));
    }
    if !row.latitude.is_finite() || !(-90.0..=90.0).contains(&row.latitude) {
        return Err(invalid(format!("latitude out of range: {}", row.latitude)));
    }
    if !row.longitude.is_finite() || !(-180.0..=180.0).contains(&row.longitude) {
        return Err(invalid(format!(
            "longitude out of range: {}",
            row.longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED_CITIES: &str = "\
city,district,post_code,latitude,longitude
Ljubljana,Center,1000,46.0511,14.5051
Ljubljana,Bežigrad,1000,46.0722,14.5142
Graz,Lend,8020,47.0758,15.4278
";

    #[test]
    fn reads_all_rows_without_filter() {
        let districts = read_seed_csv(MIXED_CITIES.as_bytes(), None).unwrap();
        assert_eq!(districts.len(), 3);
        assert_eq!(districts[1].name, "Bežigrad");
        assert_eq!(districts[1].postal_code, "1000");
    }

    #[test]
    fn filters_by_city_case_insensitively() {
        let districts = read_seed_csv(MIXED_CITIES.as_bytes(), Some("graz")).unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].name, "Lend");
        assert!((districts[0].latitude - 47.0758).abs() < 1e-9);
    }

    #[test]
    fn keeps_rows_without_city_column() {
        let csv = "district,post_code,latitude,longitude\nAuen,9500,46.61,13.83\n";
        let districts = read_seed_csv(csv.as_bytes(), Some("Villach")).unwrap();
        assert_eq!(districts.len(), 1);
    }

    #[test]
    fn postal_codes_stay_strings() {
        let csv = "district,post_code,latitude,longitude\nCenter,01000,46.05,14.50\n";
        let districts = read_seed_csv(csv.as_bytes(), None).unwrap();
        assert_eq!(districts[0].postal_code, "01000");
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let csv = "district,post_code,latitude,longitude\nNowhere,0,123.0,14.5\n";
        let err = read_seed_csv(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, SeedError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_district_names() {
        let csv = "district,post_code,latitude,longitude\nA,1,1.0,1.0\nA,2,2.0,2.0\n";
        let err = read_seed_csv(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateDistrict { name } if name == "A"));
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        let csv = "district,post_code,latitude,longitude\nA,1,north,1.0\n";
        assert!(matches!(
            read_seed_csv(csv.as_bytes(), None),
            Err(SeedError::Csv(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join("amenity_map_seed_test.csv");
        std::fs::write(&path, MIXED_CITIES).unwrap();

        let districts = load_seed_file(&path, Some("Ljubljana")).unwrap();
        assert_eq!(districts.len(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
