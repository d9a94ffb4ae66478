use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Free-form metadata attached to a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMeta {
    pub identifier: String,
    pub uid: String,
    pub action: String,
    pub content: String,
    /// List the metadata is scoped to, `None` for metadata shared by every list
    pub list: Option<String>,
}

/// A single point as returned by a point lookup.
///
/// `geohash` is the full-precision cell code computed when the point was
/// stored; prefix matching against it is how points are selected per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub identifier: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geohash: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub provider_id: String,
    pub date_created: SystemTime,
    #[serde(default)]
    pub metas: Vec<PointMeta>,
}

impl PointRecord {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        geohash: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            geohash: geohash.into(),
            provider: String::new(),
            provider_id: String::new(),
            date_created: SystemTime::now(),
            metas: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>, provider_id: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.provider_id = provider_id.into();
        self
    }

    pub fn with_date_created(mut self, date_created: SystemTime) -> Self {
        self.date_created = date_created;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Whether the stored cell code starts with any of `prefixes`.
    pub fn in_any_cell<S: AsRef<str>>(&self, prefixes: &[S]) -> bool {
        prefixes
            .iter()
            .any(|prefix| self.geohash.starts_with(prefix.as_ref()))
    }
}
