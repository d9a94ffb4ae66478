use crate::bbox::GeoBounds;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Parameters of a map annotation request: the visible viewport, its size on
/// screen and the footprint of one annotation marker, both in pixels.
///
/// Field names follow the query parameters map clients send
/// (`latitudeMin`, `pixelWidth`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRequest {
    pub latitude_min: f64,
    pub longitude_min: f64,
    pub latitude_max: f64,
    pub longitude_max: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub annotation_width: f64,
    pub annotation_height: f64,
}

impl AnnotationRequest {
    /// Build a request from a viewport plus pixel and annotation sizes as `(width, height)`.
    pub fn new(bounds: GeoBounds, pixels: (f64, f64), annotation: (f64, f64)) -> Self {
        Self {
            latitude_min: bounds.latitude_min,
            longitude_min: bounds.longitude_min,
            latitude_max: bounds.latitude_max,
            longitude_max: bounds.longitude_max,
            pixel_width: pixels.0,
            pixel_height: pixels.1,
            annotation_width: annotation.0,
            annotation_height: annotation.1,
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(
            self.latitude_min,
            self.longitude_min,
            self.latitude_max,
            self.longitude_max,
        )
    }
}

/// Paged listing of the points stored under one cell prefix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointQuery {
    /// Cell prefix the points must start with
    pub geohash: String,
    /// Cell prefixes to leave out of the page
    #[serde(default)]
    pub exclude_geohash: Vec<String>,
    /// Only points created strictly after this instant
    #[serde(default)]
    pub last_point_date: Option<SystemTime>,
    /// Page size, 0 for the configured maximum
    #[serde(default)]
    pub limit: usize,
}

impl PointQuery {
    pub fn new(geohash: impl Into<String>) -> Self {
        Self {
            geohash: geohash.into(),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_geohash.push(prefix.into());
        self
    }

    pub fn after(mut self, date: SystemTime) -> Self {
        self.last_point_date = Some(date);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
