use crate::coord::Coordinate;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A latitude/longitude rectangle, typically a map viewport.
///
/// Unlike `geo::Rect` the corners are stored as given: `longitude_min >
/// longitude_max` means the rectangle crosses the antimeridian, and
/// `latitude_min > latitude_max` is read as a rectangle spanning a pole.
///
/// # Examples
///
/// ```
/// use geocluster_types::bbox::GeoBounds;
///
/// let pacific = GeoBounds::new(-10.0, 170.0, 10.0, -170.0);
/// assert!(pacific.crosses_antimeridian());
/// assert_eq!(pacific.lon_span(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub latitude_min: f64,
    pub longitude_min: f64,
    pub latitude_max: f64,
    pub longitude_max: f64,
}

impl GeoBounds {
    pub fn new(latitude_min: f64, longitude_min: f64, latitude_max: f64, longitude_max: f64) -> Self {
        Self {
            latitude_min,
            longitude_min,
            latitude_max,
            longitude_max,
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::new(-90.0, -180.0, 90.0, 180.0)
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.longitude_min > self.longitude_max
    }

    pub fn spans_pole(&self) -> bool {
        self.latitude_min > self.latitude_max
    }

    /// Latitude extent in degrees. A pole-spanning rectangle covers the full band.
    pub fn lat_span(&self) -> f64 {
        if self.spans_pole() {
            180.0
        } else {
            self.latitude_max - self.latitude_min
        }
    }

    /// Longitude extent in degrees, measured eastward from `longitude_min`.
    pub fn lon_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            360.0 - (self.longitude_min - self.longitude_max)
        } else {
            self.longitude_max - self.longitude_min
        }
    }

    /// Corners in south-west, south-east, north-west, north-east order.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.latitude_min, self.longitude_min),
            Coordinate::new(self.latitude_min, self.longitude_max),
            Coordinate::new(self.latitude_max, self.longitude_min),
            Coordinate::new(self.latitude_max, self.longitude_max),
        ]
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        let lat_ok = if self.spans_pole() {
            true
        } else {
            (self.latitude_min..=self.latitude_max).contains(&coord.latitude)
        };
        let lon_ok = if self.crosses_antimeridian() {
            coord.longitude >= self.longitude_min || coord.longitude <= self.longitude_max
        } else {
            (self.longitude_min..=self.longitude_max).contains(&coord.longitude)
        };
        lat_ok && lon_ok
    }

    /// Planar rectangle for bounds that neither cross the antimeridian nor span a pole.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.crosses_antimeridian() || self.spans_pole() {
            return None;
        }
        Some(Rect::new(
            geo::coord! { x: self.longitude_min, y: self.latitude_min },
            geo::coord! { x: self.longitude_max, y: self.latitude_max },
        ))
    }
}
