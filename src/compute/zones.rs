//! Zone tree reduction: nested-prefix suppression for zone listings and the
//! cluster/point split for map annotations.

use geocluster_types::zone::ZoneStat;
use rustc_hash::FxHashSet;

/// Shortest ancestor prefix consulted by [`reduce_for_zone_listing`].
/// Ancestors shorter than this never suppress a zone.
pub const DEFAULT_SUPPRESSION_FLOOR: usize = 5;

/// Zones holding at most this many points are shown as individual points.
pub const DEFAULT_LOW_COUNT_THRESHOLD: u64 = 4;

/// Zones holding more points than this are left out of zone listings.
pub const DEFAULT_MAX_POINTS_PER_ZONE: u64 = 200;

/// Filter a zone tree down to the zones worth listing.
///
/// Single greedy pass in input order:
/// - zones with more than `max_points_per_zone` points are dropped;
/// - a zone is suppressed when one of its strict prefixes of length
///   `suppression_floor` up to its own length minus one was accepted
///   earlier in the same pass;
/// - everything else is accepted.
///
/// The outcome depends on input order. A child listed before its ancestor
/// is kept, and so is the ancestor.
///
/// ```
/// use geocluster::compute::zones::reduce_for_zone_listing;
/// use geocluster_types::coord::Coordinate;
/// use geocluster_types::zone::ZoneStat;
///
/// let at = Coordinate::new(0.0, 0.0);
/// let zones = vec![
///     ZoneStat::new("u0h0v", 3, at),
///     ZoneStat::new("u0h0v1", 2, at),
///     ZoneStat::new("u0h0vx", 1, at),
/// ];
/// let kept = reduce_for_zone_listing(&zones, 200, 5);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].geohash, "u0h0v");
/// ```
pub fn reduce_for_zone_listing(
    zones: &[ZoneStat],
    max_points_per_zone: u64,
    suppression_floor: usize,
) -> Vec<ZoneStat> {
    let mut accepted: FxHashSet<&str> = FxHashSet::default();
    let mut kept = Vec::new();

    for zone in zones {
        if zone.n_points > max_points_per_zone {
            continue;
        }

        let hash = zone.geohash.as_str();
        let covered = (suppression_floor..hash.len())
            .filter(|&len| hash.is_char_boundary(len))
            .any(|len| accepted.contains(&hash[..len]));
        if covered {
            continue;
        }

        accepted.insert(hash);
        kept.push(zone.clone());
    }

    kept
}

/// Zones split into cluster markers and cells whose points are shown individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonePartition {
    pub clusters: Vec<ZoneStat>,
    /// Cell codes whose points must be looked up, in input order
    pub low_count_cells: Vec<String>,
    /// Sum of the point counts of `low_count_cells`, saturating at `u64::MAX`
    pub total_low_count: u64,
}

impl ZonePartition {
    pub fn needs_point_lookup(&self) -> bool {
        !self.low_count_cells.is_empty()
    }
}

/// Split zones into cluster markers and individually shown points.
///
/// A zone is shown as points when it holds at most `low_count_threshold`
/// points, or unconditionally when `precision == max_precision` since no
/// finer level exists to drill into.
///
/// ```
/// use geocluster::compute::zones::partition_for_annotation;
/// use geocluster_types::coord::Coordinate;
/// use geocluster_types::zone::ZoneStat;
///
/// let at = Coordinate::new(0.0, 0.0);
/// let zones = vec![ZoneStat::new("u0h0v1", 4, at), ZoneStat::new("u0h0v2", 5, at)];
/// let split = partition_for_annotation(&zones, 6, 17, 4);
/// assert_eq!(split.low_count_cells, vec!["u0h0v1".to_string()]);
/// assert_eq!(split.clusters[0].geohash, "u0h0v2");
/// ```
pub fn partition_for_annotation(
    zones: &[ZoneStat],
    precision: usize,
    max_precision: usize,
    low_count_threshold: u64,
) -> ZonePartition {
    let deepest = precision == max_precision;
    let mut partition = ZonePartition::default();

    for zone in zones {
        if zone.n_points <= low_count_threshold || deepest {
            partition.low_count_cells.push(zone.geohash.clone());
            partition.total_low_count = partition.total_low_count.saturating_add(zone.n_points);
        } else {
            partition.clusters.push(zone.clone());
        }
    }

    log::trace!(
        "Partitioned {} zones at precision {}: {} clusters, {} point cells holding {} points",
        zones.len(),
        precision,
        partition.clusters.len(),
        partition.low_count_cells.len(),
        partition.total_low_count
    );

    partition
}
