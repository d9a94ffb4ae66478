//! Data source abstraction for zone statistics and point records
//!
//! The engine never stores points itself. It asks a [`ZoneSource`] for
//! per-cell aggregates and a [`PointLookup`] for the points of low-count
//! cells. Production deployments back both with a database; [`MemorySource`]
//! implements both in memory for embedding, tests and benchmarks.

use crate::compute::geohash::{MAX_PRECISION, cell_for};
use crate::compute::validation::validate_coordinate;
use crate::compute::zones::DEFAULT_SUPPRESSION_FLOOR;
use crate::error::{GeoclusterError, Result};
use geo::{Centroid, MultiPoint, Point};
use geocluster_types::coord::Coordinate;
use geocluster_types::point::{PointMeta, PointRecord};
use geocluster_types::request::PointQuery;
use geocluster_types::zone::ZoneStat;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Source of per-cell point aggregates for a list
pub trait ZoneSource: Send + Sync {
    /// Zones of exactly `precision` characters whose cell starts with any of
    /// `prefixes`.
    fn zone_tree_level(&self, list: &str, prefixes: &[String], precision: usize)
    -> Result<Vec<ZoneStat>>;

    /// The zone tree of a whole list from `min_precision` down to the finest
    /// level, coarse levels first, omitting zones holding more than
    /// `max_points_per_zone` points.
    fn list_zones(
        &self,
        list: &str,
        min_precision: usize,
        max_points_per_zone: u64,
    ) -> Result<Vec<ZoneStat>>;
}

/// Source of full point records for a list
pub trait PointLookup: Send + Sync {
    /// Points whose cell starts with any of `prefixes`, at most `limit` of them.
    fn points_in_cells(&self, list: &str, prefixes: &[String], limit: usize)
    -> Result<Vec<PointRecord>>;

    /// One page of a point listing, oldest first. `query.limit` is already
    /// capped by the caller.
    fn list_points(&self, list: &str, query: &PointQuery) -> Result<Vec<PointRecord>>;
}

impl<T: ZoneSource + ?Sized> ZoneSource for Arc<T> {
    fn zone_tree_level(
        &self,
        list: &str,
        prefixes: &[String],
        precision: usize,
    ) -> Result<Vec<ZoneStat>> {
        (**self).zone_tree_level(list, prefixes, precision)
    }

    fn list_zones(
        &self,
        list: &str,
        min_precision: usize,
        max_points_per_zone: u64,
    ) -> Result<Vec<ZoneStat>> {
        (**self).list_zones(list, min_precision, max_points_per_zone)
    }
}

impl<T: PointLookup + ?Sized> PointLookup for Arc<T> {
    fn points_in_cells(
        &self,
        list: &str,
        prefixes: &[String],
        limit: usize,
    ) -> Result<Vec<PointRecord>> {
        (**self).points_in_cells(list, prefixes, limit)
    }

    fn list_points(&self, list: &str, query: &PointQuery) -> Result<Vec<PointRecord>> {
        (**self).list_points(list, query)
    }
}

/// Source statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Number of lists holding at least one point
    pub list_count: usize,
    /// Number of point memberships across all lists
    pub point_count: usize,
}

/// Points of one zone, collected until the zone is emitted.
#[derive(Default)]
struct ZoneAccumulator {
    points: Vec<Point<f64>>,
}

impl ZoneAccumulator {
    fn add(&mut self, point: &PointRecord) {
        self.points.push(point.coordinate().to_point());
    }

    fn count(&self) -> u64 {
        self.points.len() as u64
    }

    fn into_zone(self, geohash: String) -> ZoneStat {
        let count = self.count();
        let centroid = MultiPoint::new(self.points)
            .centroid()
            .map(Coordinate::from)
            .unwrap_or(Coordinate::new(0.0, 0.0));
        ZoneStat::new(geohash, count, centroid)
    }
}

/// In-memory zone source and point lookup keyed by list identifier
pub struct MemorySource {
    lists: RwLock<FxHashMap<String, Vec<PointRecord>>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(FxHashMap::default()),
        }
    }

    /// Store a new point in `list`, returning its generated identifier.
    ///
    /// The point's cell code is computed at full precision.
    ///
    /// ```
    /// use geocluster::MemorySource;
    /// use geocluster_types::coord::Coordinate;
    ///
    /// let source = MemorySource::new();
    /// let id = source.add_point("cafes", "Le Procope", Coordinate::new(48.8530, 2.3388))?;
    /// assert_eq!(source.get_point("cafes", &id).unwrap().geohash.len(), 17);
    /// # Ok::<(), geocluster::GeoclusterError>(())
    /// ```
    pub fn add_point(&self, list: &str, name: &str, coordinate: Coordinate) -> Result<String> {
        validate_coordinate(&coordinate)?;
        let identifier = uuid::Uuid::new_v4().to_string();
        let geohash = cell_for(coordinate)?;
        let record = PointRecord::new(identifier.clone(), name, coordinate, geohash.into_string());
        self.lists
            .write()
            .entry(list.to_string())
            .or_default()
            .push(record);
        Ok(identifier)
    }

    /// Store an existing record in `list`. The record's cell code is
    /// recomputed from its coordinate.
    pub fn insert_point(&self, list: &str, mut record: PointRecord) -> Result<()> {
        let coordinate = record.coordinate();
        validate_coordinate(&coordinate)?;
        record.geohash = cell_for(coordinate)?.into_string();

        let mut lists = self.lists.write();
        let points = lists.entry(list.to_string()).or_default();
        points.retain(|point| point.identifier != record.identifier);
        points.push(record);
        Ok(())
    }

    /// Remove a point from `list`, returning it if it was present.
    pub fn remove_point(&self, list: &str, identifier: &str) -> Option<PointRecord> {
        let mut lists = self.lists.write();
        let points = lists.get_mut(list)?;
        let position = points.iter().position(|p| p.identifier == identifier)?;
        let removed = points.remove(position);
        if points.is_empty() {
            lists.remove(list);
        }
        Some(removed)
    }

    /// Attach metadata to a point of `list`.
    pub fn add_meta(&self, list: &str, identifier: &str, meta: PointMeta) -> Result<()> {
        let mut lists = self.lists.write();
        let point = lists
            .get_mut(list)
            .and_then(|points| points.iter_mut().find(|p| p.identifier == identifier))
            .ok_or_else(|| {
                GeoclusterError::InvalidInput(format!(
                    "Point {} not found in list {}",
                    identifier, list
                ))
            })?;
        point.metas.push(meta);
        Ok(())
    }

    pub fn get_point(&self, list: &str, identifier: &str) -> Option<PointRecord> {
        self.lists
            .read()
            .get(list)
            .and_then(|points| points.iter().find(|p| p.identifier == identifier).cloned())
    }

    pub fn stats(&self) -> SourceStats {
        let lists = self.lists.read();
        SourceStats {
            list_count: lists.len(),
            point_count: lists.values().map(Vec::len).sum(),
        }
    }

    fn aggregate<'a>(
        points: impl Iterator<Item = &'a PointRecord>,
        precision: usize,
    ) -> BTreeMap<String, ZoneAccumulator> {
        let mut zones: BTreeMap<String, ZoneAccumulator> = BTreeMap::new();
        for point in points {
            if point.geohash.len() < precision {
                continue;
            }
            zones
                .entry(point.geohash[..precision].to_string())
                .or_default()
                .add(point);
        }
        zones
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneSource for MemorySource {
    fn zone_tree_level(
        &self,
        list: &str,
        prefixes: &[String],
        precision: usize,
    ) -> Result<Vec<ZoneStat>> {
        let lists = self.lists.read();
        let Some(points) = lists.get(list) else {
            return Ok(Vec::new());
        };

        let matching = points.iter().filter(|point| point.in_any_cell(prefixes));
        Ok(Self::aggregate(matching, precision)
            .into_iter()
            .map(|(geohash, acc)| acc.into_zone(geohash))
            .collect())
    }

    fn list_zones(
        &self,
        list: &str,
        min_precision: usize,
        max_points_per_zone: u64,
    ) -> Result<Vec<ZoneStat>> {
        let lists = self.lists.read();
        let Some(points) = lists.get(list) else {
            return Ok(Vec::new());
        };

        let mut zones = Vec::new();
        for precision in min_precision.max(1)..=MAX_PRECISION {
            zones.extend(
                Self::aggregate(points.iter(), precision)
                    .into_iter()
                    .filter(|(_, acc)| acc.count() <= max_points_per_zone)
                    .map(|(geohash, acc)| acc.into_zone(geohash)),
            );
        }
        Ok(zones)
    }
}

impl PointLookup for MemorySource {
    fn points_in_cells(
        &self,
        list: &str,
        prefixes: &[String],
        limit: usize,
    ) -> Result<Vec<PointRecord>> {
        let lists = self.lists.read();
        let Some(points) = lists.get(list) else {
            return Ok(Vec::new());
        };

        Ok(points
            .iter()
            .filter(|point| point.in_any_cell(prefixes))
            .take(limit)
            .cloned()
            .collect())
    }

    fn list_points(&self, list: &str, query: &PointQuery) -> Result<Vec<PointRecord>> {
        let lists = self.lists.read();
        let Some(points) = lists.get(list) else {
            return Ok(Vec::new());
        };

        let mut page: Vec<PointRecord> = points
            .iter()
            .filter(|point| point.geohash.starts_with(&query.geohash))
            .filter(|point| !point.in_any_cell(&query.exclude_geohash))
            .filter(|point| {
                query
                    .last_point_date
                    .is_none_or(|after| point.date_created > after)
            })
            .cloned()
            .collect();

        page.sort_by_key(|point| point.date_created);
        page.truncate(query.limit);
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn source_with_paris() -> MemorySource {
        let source = MemorySource::new();
        source
            .add_point("paris", "Louvre", Coordinate::new(48.8606, 2.3376))
            .unwrap();
        source
            .add_point("paris", "Orsay", Coordinate::new(48.8600, 2.3266))
            .unwrap();
        source
            .add_point("paris", "Sacre-Coeur", Coordinate::new(48.8867, 2.3431))
            .unwrap();
        source
    }

    #[test]
    fn test_add_and_remove_point() {
        let source = MemorySource::new();
        let id = source
            .add_point("list", "spot", Coordinate::new(1.0, 2.0))
            .unwrap();
        assert_eq!(source.stats().point_count, 1);

        let removed = source.remove_point("list", &id).unwrap();
        assert_eq!(removed.name, "spot");
        assert_eq!(source.stats(), SourceStats::default());
        assert!(source.remove_point("list", &id).is_none());
    }

    #[test]
    fn test_add_point_rejects_invalid_coordinate() {
        let source = MemorySource::new();
        let err = source
            .add_point("list", "nowhere", Coordinate::new(100.0, 0.0))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_insert_point_replaces_same_identifier() {
        let source = MemorySource::new();
        let record = PointRecord::new("p1", "first", Coordinate::new(1.0, 1.0), "");
        source.insert_point("list", record.clone()).unwrap();
        source
            .insert_point("list", PointRecord { name: "second".into(), ..record })
            .unwrap();

        let stored = source.get_point("list", "p1").unwrap();
        assert_eq!(stored.name, "second");
        assert_eq!(stored.geohash.len(), MAX_PRECISION);
        assert_eq!(source.stats().point_count, 1);
    }

    #[test]
    fn test_add_meta() {
        let source = MemorySource::new();
        let id = source
            .add_point("list", "spot", Coordinate::new(1.0, 2.0))
            .unwrap();
        let meta = PointMeta {
            identifier: "m1".into(),
            uid: "opening_hours".into(),
            action: "text".into(),
            content: "9-18".into(),
            list: Some("list".into()),
        };
        source.add_meta("list", &id, meta.clone()).unwrap();
        assert_eq!(source.get_point("list", &id).unwrap().metas, vec![meta.clone()]);
        assert!(source.add_meta("list", "missing", meta).is_err());
    }

    #[test]
    fn test_zone_tree_level_aggregates() {
        let source = source_with_paris();
        let zones = source
            .zone_tree_level("paris", &["u09".to_string()], 5)
            .unwrap();

        let total: u64 = zones.iter().map(|z| z.n_points).sum();
        assert_eq!(total, 3);
        assert!(zones.iter().all(|z| z.geohash.len() == 5));

        let louvre_cell = cell_for(Coordinate::new(48.8606, 2.3376)).unwrap();
        let zone = zones
            .iter()
            .find(|z| louvre_cell.starts_with(z.geohash.as_str()))
            .unwrap();
        assert!(zone.centroid.latitude > 48.85 && zone.centroid.latitude < 48.89);
    }

    #[test]
    fn test_zone_centroid_is_mean() {
        let source = MemorySource::new();
        source
            .add_point("list", "a", Coordinate::new(45.7600, 4.8300))
            .unwrap();
        source
            .add_point("list", "b", Coordinate::new(45.7610, 4.8320))
            .unwrap();

        let zones = source
            .zone_tree_level("list", &["u05".to_string()], 4)
            .unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].n_points, 2);
        assert!((zones[0].centroid.latitude - 45.7605).abs() < 1e-9);
        assert!((zones[0].centroid.longitude - 4.8310).abs() < 1e-9);
    }

    #[test]
    fn test_zone_tree_level_filters_prefixes() {
        let source = source_with_paris();
        assert!(
            source
                .zone_tree_level("paris", &["s".to_string()], 5)
                .unwrap()
                .is_empty()
        );
        assert!(
            source
                .zone_tree_level("unknown", &["u".to_string()], 5)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_list_zones_is_coarse_first() {
        let source = source_with_paris();
        let zones = source.list_zones("paris", DEFAULT_SUPPRESSION_FLOOR, 200).unwrap();

        assert_eq!(zones[0].geohash.len(), DEFAULT_SUPPRESSION_FLOOR);
        assert!(
            zones
                .windows(2)
                .all(|pair| pair[0].geohash.len() <= pair[1].geohash.len())
        );
        assert_eq!(zones.last().unwrap().geohash.len(), MAX_PRECISION);
    }

    #[test]
    fn test_list_zones_starts_at_requested_level() {
        let source = source_with_paris();
        let zones = source.list_zones("paris", 3, 200).unwrap();
        assert_eq!(zones[0].geohash, "u09");
        assert_eq!(zones[0].n_points, 3);
        assert!(zones.iter().all(|z| z.geohash.len() >= 3));

        // Level 0 has no cells; the listing starts at one character.
        let zones = source.list_zones("paris", 0, 200).unwrap();
        assert_eq!(zones[0].geohash, "u");
    }

    #[test]
    fn test_list_zones_omits_dense_zones() {
        let source = source_with_paris();
        let zones = source.list_zones("paris", DEFAULT_SUPPRESSION_FLOOR, 1).unwrap();
        assert!(zones.iter().all(|z| z.n_points <= 1));
    }

    #[test]
    fn test_points_in_cells_limit() {
        let source = source_with_paris();
        let all = source
            .points_in_cells("paris", &["u09".to_string()], 10)
            .unwrap();
        assert_eq!(all.len(), 3);

        let limited = source
            .points_in_cells("paris", &["u09".to_string()], 2)
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_list_points_filters() {
        let source = MemorySource::new();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        for (i, (name, lat, lon)) in [
            ("a", 48.8606, 2.3376),
            ("b", 48.8600, 2.3266),
            ("c", 48.8867, 2.3431),
        ]
        .iter()
        .enumerate()
        {
            let record = PointRecord::new(*name, *name, Coordinate::new(*lat, *lon), "")
                .with_date_created(base + Duration::from_secs(i as u64));
            source.insert_point("paris", record).unwrap();
        }

        let everything = source
            .list_points("paris", &PointQuery::new("u09").with_limit(50))
            .unwrap();
        let names: Vec<&str> = everything.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let after = source
            .list_points("paris", &PointQuery::new("u09").after(base).with_limit(50))
            .unwrap();
        assert_eq!(after.len(), 2);

        let sacre_coeur = source.get_point("paris", "c").unwrap();
        let excluded = source
            .list_points(
                "paris",
                &PointQuery::new("u09")
                    .excluding(&sacre_coeur.geohash[..8])
                    .with_limit(50),
            )
            .unwrap();
        assert!(excluded.iter().all(|p| p.identifier != "c"));

        let page = source
            .list_points("paris", &PointQuery::new("u09").with_limit(1))
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "a");
    }

    #[test]
    fn test_shared_across_threads() {
        let source = Arc::new(MemorySource::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        source
                            .add_point(
                                "shared",
                                "p",
                                Coordinate::new(10.0 + i as f64, 20.0 + j as f64 * 0.01),
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(source.stats().point_count, 100);
    }
}
