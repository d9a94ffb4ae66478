//! GeoJSON rendering of annotation results.

use crate::error::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use geocluster_types::point::PointRecord;
use geocluster_types::zone::{ClusterResult, ZoneStat};

fn point_feature(longitude: f64, latitude: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts a cluster marker into a Point feature at the zone centroid.
pub fn zone_to_feature(zone: &ZoneStat) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), JsonValue::from("cluster"));
    properties.insert("geohash".to_string(), JsonValue::from(zone.geohash.clone()));
    properties.insert("n_points".to_string(), JsonValue::from(zone.n_points));
    point_feature(zone.centroid.longitude, zone.centroid.latitude, properties)
}

/// Converts a point record into a Point feature.
pub fn point_to_feature(point: &PointRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), JsonValue::from("point"));
    properties.insert(
        "identifier".to_string(),
        JsonValue::from(point.identifier.clone()),
    );
    properties.insert("name".to_string(), JsonValue::from(point.name.clone()));
    point_feature(point.longitude, point.latitude, properties)
}

/// Converts a whole annotation result, clusters first.
///
/// ```
/// use geocluster::compute::geojson::cluster_result_to_geojson;
/// use geocluster_types::coord::Coordinate;
/// use geocluster_types::zone::{ClusterResult, ZoneStat};
///
/// let result = ClusterResult {
///     clusters: vec![ZoneStat::new("u09tv", 12, Coordinate::new(48.85, 2.35))],
///     points: Vec::new(),
/// };
/// let collection = cluster_result_to_geojson(&result);
/// assert_eq!(collection.features.len(), 1);
/// ```
pub fn cluster_result_to_geojson(result: &ClusterResult) -> FeatureCollection {
    let features = result
        .clusters
        .iter()
        .map(zone_to_feature)
        .chain(result.points.iter().map(point_to_feature))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serialized GeoJSON string of an annotation result.
pub fn cluster_result_to_geojson_string(result: &ClusterResult) -> Result<String> {
    Ok(serde_json::to_string(&cluster_result_to_geojson(result))?)
}
