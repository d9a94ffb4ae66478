//! Geohash codec with 17-character precision and grid-step neighbor arithmetic.
//!
//! A cell code interleaves longitude and latitude bisection bits, longitude
//! first, five bits per base-32 character. At the maximum precision of 17
//! characters that is 85 bits: 43 for longitude and 42 for latitude.
//!
//! Neighbor computations work on integer row/column indices of the
//! max-resolution grid. Longitude wraps around the antimeridian; a latitude
//! step past a pole reflects back into the grid on the opposite meridian.

use crate::compute::validation::{validate_cell, validate_coordinate, validate_precision};
use crate::error::{GeoclusterError, Result};
use geocluster_types::bbox::GeoBounds;
use geocluster_types::coord::Coordinate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Longest supported cell code.
pub const MAX_PRECISION: usize = 17;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

static BASE32_REV: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, symbol) in BASE32.iter().enumerate() {
        table[*symbol as usize] = Some(value as u8);
    }
    table
});

const MAX_LON_BITS: u32 = axis_bits(MAX_PRECISION).0;
const MAX_LAT_BITS: u32 = axis_bits(MAX_PRECISION).1;

/// (longitude bits, latitude bits) carried by a cell code of `precision` characters.
const fn axis_bits(precision: usize) -> (u32, u32) {
    let total = 5 * precision as u32;
    (total.div_ceil(2), total / 2)
}

/// 5-bit value of a geohash symbol, `None` outside the alphabet.
pub(crate) fn base32_value(symbol: char) -> Option<u8> {
    if symbol.is_ascii() {
        BASE32_REV[symbol as usize]
    } else {
        None
    }
}

/// A validated geohash cell code of 1 to 17 characters.
///
/// ```
/// use geocluster::compute::geohash::GeoCell;
///
/// let cell = GeoCell::parse("u0h0v1")?;
/// assert_eq!(cell.precision(), 6);
/// assert_eq!(cell.parent().unwrap().as_str(), "u0h0v");
/// assert!(GeoCell::parse("u0h0a").is_err());
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeoCell(String);

impl GeoCell {
    pub fn parse(hash: &str) -> Result<Self> {
        validate_cell(hash)?;
        Ok(Self(hash.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn precision(&self) -> usize {
        self.0.len()
    }

    /// The enclosing cell one character shorter, `None` at precision 1.
    pub fn parent(&self) -> Option<GeoCell> {
        (self.0.len() > 1).then(|| self.truncated(self.0.len() - 1))
    }

    /// Whether `self` is a strict ancestor (shorter prefix) of `other`.
    pub fn is_ancestor_of(&self, other: &GeoCell) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub(crate) fn truncated(&self, precision: usize) -> GeoCell {
        GeoCell(self.0[..precision.min(self.0.len())].to_string())
    }
}

impl Deref for GeoCell {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GeoCell {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GeoCell {
    type Err = GeoclusterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GeoCell {
    type Error = GeoclusterError;

    fn try_from(value: String) -> Result<Self> {
        validate_cell(&value)?;
        Ok(Self(value))
    }
}

impl From<GeoCell> for String {
    fn from(cell: GeoCell) -> Self {
        cell.0
    }
}

/// Centroid and half-extents of a decoded cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedCell {
    pub centroid: Coordinate,
    /// Half the cell height in degrees
    pub lat_err: f64,
    /// Half the cell width in degrees
    pub lon_err: f64,
}

/// Row/column position of a cell in the grid of its own precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellIndex {
    pub lat: u64,
    pub lon: u64,
    pub precision: usize,
}

impl CellIndex {
    pub fn from_hash(hash: &str) -> Result<Self> {
        validate_cell(hash)?;

        let (mut lat, mut lon) = (0u64, 0u64);
        let mut is_lon = true;
        for symbol in hash.chars() {
            let value = base32_value(symbol).unwrap_or_default();
            for shift in (0..5).rev() {
                let bit = u64::from((value >> shift) & 1);
                if is_lon {
                    lon = (lon << 1) | bit;
                } else {
                    lat = (lat << 1) | bit;
                }
                is_lon = !is_lon;
            }
        }

        Ok(Self {
            lat,
            lon,
            precision: hash.len(),
        })
    }

    pub fn rows(precision: usize) -> u64 {
        1u64 << axis_bits(precision).1
    }

    pub fn cols(precision: usize) -> u64 {
        1u64 << axis_bits(precision).0
    }

    /// The cell's south-west corner on the max-resolution grid.
    pub fn at_max_resolution(&self) -> (u64, u64) {
        let (lon_bits, lat_bits) = axis_bits(self.precision);
        (
            self.lat << (MAX_LAT_BITS - lat_bits),
            self.lon << (MAX_LON_BITS - lon_bits),
        )
    }

    pub fn to_cell(self) -> GeoCell {
        let (lon_bits, lat_bits) = axis_bits(self.precision);
        let mut hash = String::with_capacity(self.precision);
        let mut value = 0usize;

        for position in 0..(5 * self.precision as u32) {
            let axis_position = position / 2;
            let bit = if position % 2 == 0 {
                (self.lon >> (lon_bits - 1 - axis_position)) & 1
            } else {
                (self.lat >> (lat_bits - 1 - axis_position)) & 1
            };
            value = (value << 1) | bit as usize;
            if position % 5 == 4 {
                hash.push(BASE32[value] as char);
                value = 0;
            }
        }

        GeoCell(hash)
    }
}

/// Encode a coordinate into a cell code of `precision` characters.
///
/// Fails with `InvalidInput` when the precision is outside `[1, 17]` or the
/// coordinate is outside the geographic ranges.
///
/// ```
/// use geocluster::compute::geohash::encode;
/// use geocluster_types::coord::Coordinate;
///
/// let cell = encode(Coordinate::new(57.64911, 10.40744), 11)?;
/// assert_eq!(cell.as_str(), "u4pruydqqvj");
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn encode(coord: Coordinate, precision: usize) -> Result<GeoCell> {
    validate_precision(precision)?;
    validate_coordinate(&coord)?;

    let (mut lat_lo, mut lat_hi) = (-90.0f64, 90.0f64);
    let (mut lon_lo, mut lon_hi) = (-180.0f64, 180.0f64);
    let mut hash = String::with_capacity(precision);
    let mut value = 0usize;
    let mut bits = 0;
    let mut is_lon = true;

    while hash.len() < precision {
        if is_lon {
            let mid = (lon_lo + lon_hi) / 2.0;
            if coord.longitude >= mid {
                value = (value << 1) | 1;
                lon_lo = mid;
            } else {
                value <<= 1;
                lon_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if coord.latitude >= mid {
                value = (value << 1) | 1;
                lat_lo = mid;
            } else {
                value <<= 1;
                lat_hi = mid;
            }
        }
        is_lon = !is_lon;

        bits += 1;
        if bits == 5 {
            hash.push(BASE32[value] as char);
            bits = 0;
            value = 0;
        }
    }

    Ok(GeoCell(hash))
}

/// The full-precision cell stored alongside a point.
pub fn cell_for(coord: Coordinate) -> Result<GeoCell> {
    encode(coord, MAX_PRECISION)
}

/// Narrow the latitude and longitude intervals along the cell's bits.
fn bisect(hash: &str) -> Result<((f64, f64), (f64, f64))> {
    validate_cell(hash)?;

    let mut lat = (-90.0f64, 90.0f64);
    let mut lon = (-180.0f64, 180.0f64);
    let mut is_lon = true;

    for symbol in hash.chars() {
        let value = base32_value(symbol).unwrap_or_default();
        for shift in (0..5).rev() {
            let interval = if is_lon { &mut lon } else { &mut lat };
            let mid = (interval.0 + interval.1) / 2.0;
            if (value >> shift) & 1 == 1 {
                interval.0 = mid;
            } else {
                interval.1 = mid;
            }
            is_lon = !is_lon;
        }
    }

    Ok((lat, lon))
}

/// Decode a cell code into its centroid and half-extents.
///
/// ```
/// use geocluster::compute::geohash::decode;
///
/// let cell = decode("ezs42")?;
/// assert!((cell.centroid.latitude - 42.605).abs() < cell.lat_err);
/// assert!((cell.centroid.longitude - -5.603).abs() < cell.lon_err);
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn decode(hash: &str) -> Result<DecodedCell> {
    let ((lat_lo, lat_hi), (lon_lo, lon_hi)) = bisect(hash)?;
    Ok(DecodedCell {
        centroid: Coordinate::new((lat_lo + lat_hi) / 2.0, (lon_lo + lon_hi) / 2.0),
        lat_err: (lat_hi - lat_lo) / 2.0,
        lon_err: (lon_hi - lon_lo) / 2.0,
    })
}

/// The rectangle a cell code denotes.
pub fn decode_bounds(hash: &str) -> Result<GeoBounds> {
    let ((lat_lo, lat_hi), (lon_lo, lon_hi)) = bisect(hash)?;
    Ok(GeoBounds::new(lat_lo, lon_lo, lat_hi, lon_hi))
}

/// Cell height and width in degrees at `precision`.
pub fn cell_size(precision: usize) -> Result<(f64, f64)> {
    validate_precision(precision)?;
    Ok((
        180.0 / CellIndex::rows(precision) as f64,
        360.0 / CellIndex::cols(precision) as f64,
    ))
}

/// Move `(lat, lon)` on the max-resolution grid by signed steps.
fn step_max_resolution(lat: u64, lon: u64, lat_steps: i64, lon_steps: i64) -> (u64, u64) {
    let rows = 1i128 << MAX_LAT_BITS;
    let cols = 1i128 << MAX_LON_BITS;

    // Odd bands lie past a pole: mirror the row and continue on the far meridian.
    let lat = i128::from(lat) + i128::from(lat_steps);
    let offset = lat.rem_euclid(rows);
    let over_pole = lat.div_euclid(rows).rem_euclid(2) == 1;
    let lat = if over_pole { rows - 1 - offset } else { offset };

    let mut lon = i128::from(lon) + i128::from(lon_steps);
    if over_pole {
        lon += cols / 2;
    }
    let lon = lon.rem_euclid(cols);

    (lat as u64, lon as u64)
}

fn neighbor_of_index(index: &CellIndex, lat_steps: i64, lon_steps: i64) -> GeoCell {
    let (lat, lon) = index.at_max_resolution();
    let (lat, lon) = step_max_resolution(lat, lon, lat_steps, lon_steps);
    CellIndex {
        lat,
        lon,
        precision: MAX_PRECISION,
    }
    .to_cell()
    .truncated(index.precision)
}

/// The cell reached by stepping `lat_steps` rows and `lon_steps` columns of
/// the max-resolution grid from the south-west corner of `hash`, truncated
/// back to the length of `hash`.
///
/// ```
/// use geocluster::compute::geohash::neighbor_grid;
///
/// assert_eq!(neighbor_grid("u0h0v", 0, 0)?.as_str(), "u0h0v");
/// // One max-resolution step west leaves the cell.
/// assert_ne!(neighbor_grid("u0h0v", 0, -1)?.as_str(), "u0h0v");
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn neighbor_grid(hash: &str, lat_steps: i64, lon_steps: i64) -> Result<GeoCell> {
    let index = CellIndex::from_hash(hash)?;
    Ok(neighbor_of_index(&index, lat_steps, lon_steps))
}

fn scale_steps(steps: i64, unit: i64, axis: &str) -> Result<i64> {
    steps.checked_mul(unit).ok_or_else(|| {
        GeoclusterError::InvalidInput(format!(
            "{} step of {} overflows the grid arithmetic",
            axis, steps
        ))
    })
}

/// The cell `lat_cells` rows and `lon_cells` columns away, counted in cells
/// of the same precision as `hash`.
///
/// ```
/// use geocluster::compute::geohash::adjacent;
///
/// // The last column of the bottom row wraps east onto the first.
/// assert_eq!(adjacent("p", 0, 1)?.as_str(), "0");
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn adjacent(hash: &str, lat_cells: i64, lon_cells: i64) -> Result<GeoCell> {
    let index = CellIndex::from_hash(hash)?;
    let (lon_bits, lat_bits) = axis_bits(index.precision);
    let lat_unit = 1i64 << (MAX_LAT_BITS - lat_bits);
    let lon_unit = 1i64 << (MAX_LON_BITS - lon_bits);

    let lat_steps = scale_steps(lat_cells, lat_unit, "Latitude")?;
    let lon_steps = scale_steps(lon_cells, lon_unit, "Longitude")?;
    Ok(neighbor_of_index(&index, lat_steps, lon_steps))
}

/// Step multiplier applied to surrounding-grid offsets for a cell of `precision` characters.
pub fn surrounding_step(precision: usize) -> i64 {
    let power = MAX_PRECISION.saturating_sub(precision) as i64;
    power * power
}

/// The `(2 * radius + 1)^2` cells around `hash`, row-major: latitude offset
/// `i` outer, longitude offset `j` inner, both in `[-radius, radius]`. Each
/// offset is scaled by [`surrounding_step`] max-resolution units.
///
/// Fails with `InvalidInput` when `hash` is longer than 17 characters.
pub fn grid_surrounding(hash: &str, radius: u8) -> Result<Vec<GeoCell>> {
    if hash.len() > MAX_PRECISION {
        return Err(GeoclusterError::InvalidInput(format!(
            "Geohash length cannot be > {}, got {}",
            MAX_PRECISION,
            hash.len()
        )));
    }
    let index = CellIndex::from_hash(hash)?;
    let multiplier = surrounding_step(index.precision);
    let radius = i64::from(radius);
    let side = (2 * radius + 1) as usize;

    let mut cells = Vec::with_capacity(side * side);
    for i in -radius..=radius {
        let lat_steps = scale_steps(i, multiplier, "Latitude")?;
        for j in -radius..=radius {
            let lon_steps = scale_steps(j, multiplier, "Longitude")?;
            cells.push(neighbor_of_index(&index, lat_steps, lon_steps));
        }
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let cell = encode(Coordinate::new(42.605, -5.603), 5).unwrap();
        assert_eq!(cell.as_str(), "ezs42");

        let cell = encode(Coordinate::new(57.64911, 10.40744), 11).unwrap();
        assert_eq!(cell.as_str(), "u4pruydqqvj");
    }

    #[test]
    fn test_encode_is_prefix_stable() {
        let coord = Coordinate::new(48.8566, 2.3522);
        let full = encode(coord, MAX_PRECISION).unwrap();
        for precision in 1..MAX_PRECISION {
            let shorter = encode(coord, precision).unwrap();
            assert!(full.starts_with(shorter.as_str()));
        }
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert!(encode(Coordinate::new(0.0, 0.0), 0).is_err());
        assert!(encode(Coordinate::new(0.0, 0.0), 18).is_err());
        assert!(encode(Coordinate::new(91.0, 0.0), 5).is_err());
        assert!(encode(Coordinate::new(0.0, 200.0), 5).is_err());
    }

    #[test]
    fn test_encode_extreme_corners() {
        assert_eq!(encode(Coordinate::new(-90.0, -180.0), 3).unwrap().as_str(), "000");
        assert_eq!(encode(Coordinate::new(90.0, 180.0), 3).unwrap().as_str(), "zzz");
    }

    #[test]
    fn test_decode_roundtrip_within_error() {
        let samples = [
            Coordinate::new(48.8566, 2.3522),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(64.1466, -21.9426),
            Coordinate::new(-89.9999, 179.9999),
            Coordinate::new(89.9999, -179.9999),
        ];
        for coord in samples {
            for precision in 1..=MAX_PRECISION {
                let cell = encode(coord, precision).unwrap();
                let decoded = decode(&cell).unwrap();
                assert!(
                    (decoded.centroid.latitude - coord.latitude).abs() <= decoded.lat_err,
                    "latitude drift at precision {} for {:?}",
                    precision,
                    coord
                );
                assert!(
                    (decoded.centroid.longitude - coord.longitude).abs() <= decoded.lon_err,
                    "longitude drift at precision {} for {:?}",
                    precision,
                    coord
                );
            }
        }
    }

    #[test]
    fn test_decode_rejects_bad_alphabet() {
        let err = decode("u0ha").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_decode_bounds_match_cell_size() {
        let bounds = decode_bounds("u0h0v").unwrap();
        let (height, width) = cell_size(5).unwrap();
        assert!((bounds.lat_span() - height).abs() < 1e-12);
        assert!((bounds.lon_span() - width).abs() < 1e-12);
    }

    #[test]
    fn test_cell_index_roundtrip() {
        for hash in ["0", "zz", "u0h0v", "ezs42", "u4pruydqqvj", "0123456789bcdefgh"] {
            let index = CellIndex::from_hash(hash).unwrap();
            assert_eq!(index.to_cell().as_str(), hash);
        }
    }

    #[test]
    fn test_axis_bits() {
        assert_eq!(axis_bits(1), (3, 2));
        assert_eq!(axis_bits(2), (5, 5));
        assert_eq!(axis_bits(MAX_PRECISION), (43, 42));
    }

    #[test]
    fn test_zero_step_identity() {
        for hash in ["0", "zz", "u0h0v", "u4pruydqqvj", "zzzzzzzzzzzzzzzzz"] {
            let cell = neighbor_grid(hash, 0, 0).unwrap();
            assert_eq!(cell.as_str(), hash);
            assert_eq!(cell.precision(), hash.len());
        }
    }

    #[test]
    fn test_max_resolution_steps() {
        let cell = encode(Coordinate::new(48.8566, 2.3522), MAX_PRECISION).unwrap();
        let east = neighbor_grid(&cell, 0, 1).unwrap();
        let west = neighbor_grid(&cell, 0, -1).unwrap();
        assert_ne!(east, cell);
        assert_ne!(west, cell);
        assert_eq!(neighbor_grid(&east, 0, -1).unwrap(), cell);
        assert_eq!(neighbor_grid(&west, 0, 1).unwrap(), cell);

        let north = neighbor_grid(&cell, 1, 0).unwrap();
        assert!(decode(&north).unwrap().centroid.latitude > decode(&cell).unwrap().centroid.latitude);
    }

    #[test]
    fn test_adjacent_cells_touch() {
        let cell = "u0h0v";
        let (height, width) = cell_size(5).unwrap();
        let origin = decode_bounds(cell).unwrap();

        let east = decode_bounds(&adjacent(cell, 0, 1).unwrap()).unwrap();
        assert!((east.longitude_min - origin.longitude_max).abs() < 1e-12);
        assert!((east.lon_span() - width).abs() < 1e-12);

        let south = decode_bounds(&adjacent(cell, -1, 0).unwrap()).unwrap();
        assert!((south.latitude_max - origin.latitude_min).abs() < 1e-12);
        assert!((south.lat_span() - height).abs() < 1e-12);
    }

    #[test]
    fn test_antimeridian_wraps() {
        let east_edge = encode(Coordinate::new(10.0, 179.999), 6).unwrap();
        let west_edge = encode(Coordinate::new(10.0, -179.999), 6).unwrap();

        // One max-resolution unit east stays inside the east-edge cell, which
        // borders the west-edge cell across the antimeridian.
        let stepped = neighbor_grid(&east_edge, 0, 1).unwrap();
        assert_eq!(stepped.precision(), 6);
        assert_ne!(stepped, west_edge);
        assert_eq!(adjacent(&stepped, 0, 1).unwrap(), west_edge);

        // A whole cell east crosses over.
        assert_eq!(adjacent(&east_edge, 0, 1).unwrap(), west_edge);
        assert_eq!(adjacent(&west_edge, 0, -1).unwrap(), east_edge);
    }

    #[test]
    fn test_pole_reflection() {
        let top = encode(Coordinate::new(89.99, 10.0), 4).unwrap();
        let over = adjacent(&top, 1, 0).unwrap();
        let decoded = decode(&over).unwrap();

        // Still in the top row, 180 degrees away.
        assert!(decoded.centroid.latitude > 89.0);
        assert!((decoded.centroid.longitude - (10.0 - 180.0)).abs() < 1.0);

        let bottom = encode(Coordinate::new(-89.99, -170.0), 4).unwrap();
        let under = decode(&adjacent(&bottom, -1, 0).unwrap()).unwrap();
        assert!(under.centroid.latitude < -89.0);
        assert!((under.centroid.longitude - 10.0).abs() < 1.0);
    }

    #[test]
    fn test_full_circle_returns_home() {
        let cell = "u0h0v";
        let rows = CellIndex::rows(5) as i64;
        let cols = CellIndex::cols(5) as i64;
        assert_eq!(adjacent(cell, 2 * rows, 0).unwrap().as_str(), cell);
        assert_eq!(adjacent(cell, 0, cols).unwrap().as_str(), cell);
        assert_eq!(adjacent(cell, 0, -3 * cols).unwrap().as_str(), cell);
    }

    #[test]
    fn test_adjacent_overflow_is_rejected() {
        let err = adjacent("u", i64::MAX, 0).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_grid_surrounding_shape() {
        for (hash, radius) in [("u0h0v", 1u8), ("u4pruydqqvj", 2), ("zzzzzzzzzzzzzzzz", 3)] {
            let cells = grid_surrounding(hash, radius).unwrap();
            let side = (2 * radius + 1) as usize;
            assert_eq!(cells.len(), side * side);
            assert!(cells.iter().all(|cell| cell.precision() == hash.len()));
            // Row-major: the middle entry is the zero offset.
            assert_eq!(cells[cells.len() / 2].as_str(), hash);
        }
    }

    #[test]
    fn test_grid_surrounding_order() {
        let hash = "0123456789bcdefg";
        let multiplier = surrounding_step(hash.len());
        let cells = grid_surrounding(hash, 1).unwrap();
        let mut expected = Vec::new();
        for i in -1..=1i64 {
            for j in -1..=1i64 {
                expected.push(neighbor_grid(hash, i * multiplier, j * multiplier).unwrap());
            }
        }
        assert_eq!(cells, expected);
        assert_eq!(multiplier, 1);
    }

    #[test]
    fn test_grid_surrounding_rejects_long_cell() {
        let err = grid_surrounding("0123456789bcdefghj", 1).unwrap_err();
        assert!(err.to_string().contains("cannot be > 17"));
    }

    #[test]
    fn test_grid_surrounding_widest_radius() {
        let cells = grid_surrounding("u0h0v", u8::MAX).unwrap();
        assert_eq!(cells.len(), 511 * 511);
        assert_eq!(cells[cells.len() / 2].as_str(), "u0h0v");
        assert!(cells.iter().all(|cell| cell.precision() == 5));
    }

    #[test]
    fn test_geocell_serde() {
        let cell = GeoCell::parse("u0h0v").unwrap();
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, "\"u0h0v\"");
        let back: GeoCell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
        assert!(serde_json::from_str::<GeoCell>("\"u0h0a\"").is_err());
    }

    #[test]
    fn test_geocell_ancestry() {
        let parent = GeoCell::parse("u0h0v").unwrap();
        let child = GeoCell::parse("u0h0vx").unwrap();
        assert!(parent.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&parent));
        assert!(!parent.is_ancestor_of(&parent));
        assert_eq!(child.parent(), Some(parent));
        assert_eq!(GeoCell::parse("u").unwrap().parent(), None);
    }
}
