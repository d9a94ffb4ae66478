use crate::coord::Coordinate;
use crate::point::PointRecord;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one geohash cell.
///
/// Produced by a zone statistics source for a single request and never
/// mutated afterwards. Serializes flat, with the centroid as top-level
/// `latitude`/`longitude` fields:
///
/// ```
/// use geocluster_types::coord::Coordinate;
/// use geocluster_types::zone::ZoneStat;
///
/// let zone = ZoneStat::new("u09tv", 12, Coordinate::new(48.85, 2.35));
/// let json = serde_json::to_string(&zone).unwrap();
/// assert_eq!(json, r#"{"geohash":"u09tv","n_points":12,"latitude":48.85,"longitude":2.35}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStat {
    /// Cell code the statistics were aggregated over
    pub geohash: String,
    /// Number of points inside the cell
    pub n_points: u64,
    /// Mean position of the points inside the cell
    #[serde(flatten)]
    pub centroid: Coordinate,
}

impl ZoneStat {
    pub fn new(geohash: impl Into<String>, n_points: u64, centroid: Coordinate) -> Self {
        Self {
            geohash: geohash.into(),
            n_points,
            centroid,
        }
    }

    pub fn precision(&self) -> usize {
        self.geohash.len()
    }
}

/// What a map client should draw for one viewport.
///
/// `clusters` are rendered as aggregate markers, `points` individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub clusters: Vec<ZoneStat>,
    pub points: Vec<PointRecord>,
}

impl ClusterResult {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.points.is_empty()
    }

    /// Points represented by the result, counting every point behind each
    /// cluster. Saturates at `u64::MAX`.
    pub fn represented_points(&self) -> u64 {
        self.clusters
            .iter()
            .fold(self.points.len() as u64, |total, zone| total.saturating_add(zone.n_points))
    }
}
