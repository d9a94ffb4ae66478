//! Viewport coverage: the cells of one precision intersecting a rectangle.
//!
//! The covered block is located from the cells of the rectangle's four
//! corners and walked row by row, column by column. Antimeridian-crossing
//! rectangles wrap their columns; rectangles whose inverted latitude marks
//! them as spanning a pole take the full latitude band. Block sizes are
//! computed up front, so enumeration always terminates.

use crate::compute::geohash::{CellIndex, GeoCell, encode};
use crate::compute::validation::{validate_bounds, validate_precision};
use crate::error::{GeoclusterError, Result};
use geocluster_types::bbox::GeoBounds;
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Default cap on the number of prefixes one coverage may produce.
pub const DEFAULT_MAX_COVERAGE_CELLS: u64 = 4096;

/// Rows and columns of the covered block, columns possibly wrapping.
#[derive(Debug, Clone, Copy)]
struct CoverageSpan {
    precision: usize,
    first_row: u64,
    rows: u64,
    first_col: u64,
    cols: u64,
}

impl CoverageSpan {
    fn locate(bounds: &GeoBounds, precision: usize) -> Result<Self> {
        validate_precision(precision)?;
        validate_bounds(bounds)?;

        let corners = bounds
            .corners()
            .iter()
            .map(|corner| encode(*corner, precision).and_then(|cell| CellIndex::from_hash(&cell)))
            .collect::<Result<SmallVec<[CellIndex; 4]>>>()?;

        let total_rows = CellIndex::rows(precision);
        let total_cols = CellIndex::cols(precision);

        let (first_row, rows) = if bounds.spans_pole() {
            log::warn!(
                "Latitude bounds {} > {} read as spanning a pole; covering the full latitude band",
                bounds.latitude_min,
                bounds.latitude_max
            );
            (0, total_rows)
        } else {
            let low = corners.iter().map(|c| c.lat).min().unwrap_or_default();
            let high = corners.iter().map(|c| c.lat).max().unwrap_or_default();
            (low, high - low + 1)
        };

        // corners: south-west, south-east, north-west, north-east
        let west = corners[0].lon;
        let east = corners[1].lon;
        let (first_col, cols) = if !bounds.crosses_antimeridian() {
            (west, east - west + 1)
        } else if east >= west {
            // Wrapping eastward from `west` reaches `west` again.
            (0, total_cols)
        } else {
            (west, total_cols - west + east + 1)
        };

        Ok(Self {
            precision,
            first_row,
            rows,
            first_col,
            cols,
        })
    }

    fn count(&self) -> u64 {
        self.rows.saturating_mul(self.cols)
    }

    fn cells(&self) -> BTreeSet<GeoCell> {
        let total_cols = CellIndex::cols(self.precision);
        let mut visited = BTreeSet::new();

        for row in self.first_row..self.first_row + self.rows {
            for step in 0..self.cols {
                let index = CellIndex {
                    lat: row,
                    lon: (self.first_col + step) % total_cols,
                    precision: self.precision,
                };
                visited.insert(index.to_cell());
            }
        }
        visited
    }
}

/// Every cell of `precision` intersecting `bounds`.
///
/// ```
/// use geocluster::compute::coverage::coverage;
/// use geocluster::compute::geohash::encode;
/// use geocluster_types::bbox::GeoBounds;
///
/// let paris = GeoBounds::new(48.80, 2.25, 48.91, 2.42);
/// let cells = coverage(&paris, 5)?;
/// for corner in paris.corners() {
///     assert!(cells.contains(&encode(corner, 5)?));
/// }
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn coverage(bounds: &GeoBounds, precision: usize) -> Result<BTreeSet<GeoCell>> {
    Ok(CoverageSpan::locate(bounds, precision)?.cells())
}

/// Number of cells [`coverage`] returns, without enumerating them.
pub fn coverage_count(bounds: &GeoBounds, precision: usize) -> Result<u64> {
    Ok(CoverageSpan::locate(bounds, precision)?.count())
}

/// Coverage of `bounds` at `precision` or, when that exceeds `max_cells`,
/// at the finest coarser precision that fits. Returns the precision used.
///
/// Coarser prefixes still cover the rectangle since lookups match cells by
/// prefix. Precision 1 is returned even when it exceeds the budget.
pub fn covering_prefixes(
    bounds: &GeoBounds,
    precision: usize,
    max_cells: u64,
) -> Result<(usize, BTreeSet<GeoCell>)> {
    if max_cells == 0 {
        return Err(GeoclusterError::InvalidInput(
            "Coverage cell budget must be greater than zero".to_string(),
        ));
    }

    let mut level = precision;
    loop {
        let span = CoverageSpan::locate(bounds, level)?;
        if span.count() <= max_cells || level == 1 {
            if level < precision {
                log::debug!(
                    "Coverage at precision {} exceeds {} cells; using precision {} ({} cells)",
                    precision,
                    max_cells,
                    level,
                    span.count()
                );
            }
            return Ok((level, span.cells()));
        }
        level -= 1;
    }
}
