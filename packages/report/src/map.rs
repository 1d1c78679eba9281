//! `GeoJSON` map layer of cluster membership.
//!
//! Each district becomes a point feature carrying its cluster label, a
//! cluster colour and its priority frequencies. The collection itself
//! carries the map centre (centroid of all district coordinates) so an
//! external viewer can frame the city.

use amenity_map_district_models::District;
use amenity_map_pipeline::CityAnalysis;
use geo::{Centroid, MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

/// Evenly spaced colours along the rainbow colormap (violet to red), one
/// per cluster, as `#rrggbb`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rainbow_palette(clusters: usize) -> Vec<String> {
    match clusters {
        0 => Vec::new(),
        1 => vec![rainbow(0.0)],
        _ => {
            let last = (clusters - 1) as f64;
            (0..clusters).map(|i| rainbow(i as f64 / last)).collect()
        }
    }
}

/// Rainbow colormap at `x` in `[0, 1]`.
fn rainbow(x: f64) -> String {
    let r = 2.0f64.mul_add(x, -0.5).abs();
    let g = (std::f64::consts::PI * x).sin();
    let b = (std::f64::consts::FRAC_PI_2 * x).cos();
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Centroid of the district coordinates as `(longitude, latitude)`.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn map_center(districts: &[District]) -> Option<(f64, f64)> {
    let points: Vec<Point<f64>> = districts
        .iter()
        .map(|d| Point::new(d.longitude, d.latitude))
        .collect();
    MultiPoint::from(points).centroid().map(|c| (c.x(), c.y()))
}

/// Builds the map layer of an analysis.
#[must_use]
pub fn feature_collection(analysis: &CityAnalysis) -> FeatureCollection {
    let palette = rainbow_palette(analysis.clustering.clusters);
    let labels = analysis.priority_categories.labels();

    let features = analysis
        .districts
        .iter()
        .map(|result| {
            let district = &result.district;
            let geometry = Geometry::new(geojson::Value::from(&Point::new(
                district.longitude,
                district.latitude,
            )));

            let mut frequencies = JsonObject::new();
            for (label, value) in labels.iter().zip(result.reduced.as_slice()) {
                frequencies.insert(label.clone(), JsonValue::from(*value));
            }

            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), JsonValue::from(district.name.clone()));
            properties.insert(
                "postalCode".to_string(),
                JsonValue::from(district.postal_code.clone()),
            );
            properties.insert("cluster".to_string(), JsonValue::from(result.cluster));
            properties.insert(
                "color".to_string(),
                JsonValue::from(palette.get(result.cluster).cloned().unwrap_or_default()),
            );
            properties.insert(
                "priorityShare".to_string(),
                JsonValue::from(result.reduced.priority_share()),
            );
            properties.insert("frequencies".to_string(), JsonValue::Object(frequencies));

            Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let districts: Vec<District> = analysis
        .districts
        .iter()
        .map(|r| r.district.clone())
        .collect();
    let mut members = JsonObject::new();
    members.insert("city".to_string(), JsonValue::from(analysis.city.clone()));
    members.insert(
        "clusters".to_string(),
        JsonValue::from(analysis.clustering.clusters),
    );
    members.insert("seed".to_string(), JsonValue::from(analysis.clustering.seed));
    match map_center(&districts) {
        Some((lon, lat)) => {
            members.insert("center".to_string(), JsonValue::from(vec![lon, lat]));
        }
        None => log::warn!("{}: no districts, map has no centre", analysis.city),
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    }
}
