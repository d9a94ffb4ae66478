//! Clustering engine entry points.
//!
//! [`ClusterEngine`] wires the compute layer to the data sources: it resolves
//! the precision for a viewport, enumerates the covering prefixes, asks the
//! zone source for zones, partitions them and fetches the points of
//! low-count cells. It holds no per-request state and is safe to share
//! between threads.

use crate::compute::coverage::covering_prefixes;
use crate::compute::geohash::{GeoCell, cell_for};
use crate::compute::precision::{Resolution, resolve};
use crate::compute::validation::{validate_annotation_request, validate_cell, validate_cell_prefix};
use crate::compute::zones::{partition_for_annotation, reduce_for_zone_listing};
use crate::config::Config;
use crate::error::{GeoclusterError, Result};
use crate::source::{PointLookup, ZoneSource};
use geocluster_types::coord::Coordinate;
use geocluster_types::point::PointRecord;
use geocluster_types::request::{AnnotationRequest, PointQuery};
use geocluster_types::zone::{ClusterResult, ZoneStat};
use std::sync::Arc;

/// Stateless clustering engine over a zone source and a point lookup.
///
/// ```rust
/// use geocluster::{EngineBuilder, MemorySource};
/// use geocluster_types::bbox::GeoBounds;
/// use geocluster_types::coord::Coordinate;
/// use geocluster_types::request::AnnotationRequest;
/// use std::sync::Arc;
///
/// let source = Arc::new(MemorySource::new());
/// source.add_point("cafes", "Le Procope", Coordinate::new(48.8530, 2.3388))?;
///
/// let engine = EngineBuilder::new().source(source).build()?;
/// let request = AnnotationRequest::new(
///     GeoBounds::new(48.80, 2.25, 48.91, 2.42),
///     (800.0, 600.0),
///     (40.0, 40.0),
/// );
/// let result = engine.annotations("cafes", &request)?;
/// assert_eq!(result.points.len(), 1);
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub struct ClusterEngine {
    pub(crate) config: Config,
    pub(crate) zones: Arc<dyn ZoneSource>,
    pub(crate) points: Arc<dyn PointLookup>,
}

impl std::fmt::Debug for ClusterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClusterEngine {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Precision the annotation pipeline would use for `request`.
    pub fn resolve_precision(&self, request: &AnnotationRequest) -> Result<Resolution> {
        resolve(
            request,
            self.config.min_precision,
            self.config.max_precision,
        )
    }

    /// Full-precision cell code for a point being stored.
    pub fn cell_for(&self, coordinate: Coordinate) -> Result<GeoCell> {
        cell_for(coordinate)
    }

    /// Cluster markers and individual points to draw for one viewport of `list`.
    pub fn annotations(&self, list: &str, request: &AnnotationRequest) -> Result<ClusterResult> {
        validate_annotation_request(request)?;

        let precision = self.resolve_precision(request)?.precision;
        let (prefix_precision, prefixes) = covering_prefixes(
            &request.bounds(),
            precision - 1,
            self.config.max_coverage_cells,
        )?;
        let prefixes: Vec<String> = prefixes.into_iter().map(GeoCell::into_string).collect();

        log::debug!(
            "Annotations for list {}: precision {}, {} prefixes at precision {}",
            list,
            precision,
            prefixes.len(),
            prefix_precision
        );

        let zones = self.zones.zone_tree_level(list, &prefixes, precision)?;
        check_zones(&zones, Some(precision))?;

        let partition = partition_for_annotation(
            &zones,
            precision,
            self.config.max_precision,
            self.config.low_count_threshold,
        );

        let points = if partition.needs_point_lookup() {
            let limit = usize::try_from(partition.total_low_count).unwrap_or(usize::MAX);
            self.points
                .points_in_cells(list, &partition.low_count_cells, limit)?
        } else {
            Vec::new()
        };

        Ok(ClusterResult {
            clusters: partition.clusters,
            points,
        })
    }

    /// Deduplicated zone listing of `list`, capped at `max_zone_count` zones.
    pub fn zones(&self, list: &str) -> Result<Vec<ZoneStat>> {
        let zones = self.zones.list_zones(
            list,
            self.config.suppression_floor,
            self.config.max_points_per_zone,
        )?;
        check_zones(&zones, None)?;

        let mut kept = reduce_for_zone_listing(
            &zones,
            self.config.max_points_per_zone,
            self.config.suppression_floor,
        );
        if kept.len() > self.config.max_zone_count {
            log::debug!(
                "Zone listing for {} truncated from {} to {} zones",
                list,
                kept.len(),
                self.config.max_zone_count
            );
            kept.truncate(self.config.max_zone_count);
        }
        Ok(kept)
    }

    /// One page of the points stored under `query.geohash`.
    pub fn points(&self, list: &str, query: &PointQuery) -> Result<Vec<PointRecord>> {
        validate_cell_prefix(&query.geohash)?;
        for (idx, prefix) in query.exclude_geohash.iter().enumerate() {
            validate_cell_prefix(prefix).map_err(|e| {
                GeoclusterError::InvalidInput(format!("Excluded prefix at index {}: {}", idx, e))
            })?;
        }

        let limit = match query.limit {
            0 => self.config.max_page_size,
            limit => limit.min(self.config.max_page_size),
        };
        let capped = PointQuery {
            limit,
            ..query.clone()
        };

        self.points.list_points(list, &capped)
    }
}

/// Reject zones a source should never have produced.
fn check_zones(zones: &[ZoneStat], precision: Option<usize>) -> Result<()> {
    let mut total: u64 = 0;
    for zone in zones {
        if let Err(e) = validate_cell(&zone.geohash) {
            log::warn!("Rejecting malformed zone from source: {}", e);
            return Err(GeoclusterError::UpstreamData(format!(
                "Zone has a malformed cell code: {}",
                e
            )));
        }
        if let Some(expected) = precision
            && zone.geohash.len() != expected
        {
            log::warn!(
                "Rejecting zone {} from source: expected precision {}",
                zone.geohash,
                expected
            );
            return Err(GeoclusterError::UpstreamData(format!(
                "Zone {} has precision {}, expected {}",
                zone.geohash,
                zone.geohash.len(),
                expected
            )));
        }
        if !zone.centroid.is_valid() {
            log::warn!("Rejecting zone {} from source: bad centroid", zone.geohash);
            return Err(GeoclusterError::UpstreamData(format!(
                "Zone {} has an invalid centroid ({}, {})",
                zone.geohash, zone.centroid.latitude, zone.centroid.longitude
            )));
        }
        total = match total.checked_add(zone.n_points) {
            Some(total) => total,
            None => {
                log::warn!("Rejecting zones from source: point counts overflow at {}", zone.geohash);
                return Err(GeoclusterError::UpstreamData(format!(
                    "Zone point counts overflow at zone {} ({} points)",
                    zone.geohash, zone.n_points
                )));
            }
        };
    }
    Ok(())
}
