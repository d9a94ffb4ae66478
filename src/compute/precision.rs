//! Pick the cell precision at which one cell covers about one annotation
//! marker on screen.

use crate::compute::geohash::MAX_PRECISION;
use crate::compute::validation::{validate_annotation_request, validate_precision};
use crate::error::{GeoclusterError, Result};
use geocluster_types::request::AnnotationRequest;

pub const DEFAULT_MIN_ANNOTATION_PRECISION: usize = 5;
pub const DEFAULT_MAX_ANNOTATION_PRECISION: usize = MAX_PRECISION;

/// Which viewport axis bounds the number of markers that fit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitingAxis {
    Longitude,
    Latitude,
}

/// Intermediate values of a precision resolution, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub max_annotations_per_axis: f64,
    pub axis: LimitingAxis,
    pub degrees_per_annotation: f64,
    pub precision: usize,
}

/// Resolve the precision for a viewport, clamped to `[min, max]`.
///
/// 1. `max annotations = max(pixelWidth / (2 * annotationWidth), pixelHeight / (2 * annotationHeight))`
/// 2. The axis with more room (longitude on a strict win, latitude on ties)
///    divides its span by that count to get degrees per annotation.
/// 3. `floor(log2(180 / degrees per annotation))`, clamped.
///
/// An empty span yields the finest precision.
///
/// ```
/// use geocluster::compute::precision::resolve;
/// use geocluster_types::bbox::GeoBounds;
/// use geocluster_types::request::AnnotationRequest;
///
/// let request = AnnotationRequest::new(
///     GeoBounds::new(40.0, 0.0, 50.0, 10.0),
///     (800.0, 800.0),
///     (40.0, 40.0),
/// );
/// assert_eq!(resolve(&request, 5, 17)?.precision, 7);
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
pub fn resolve(request: &AnnotationRequest, min: usize, max: usize) -> Result<Resolution> {
    validate_annotation_request(request)?;
    validate_precision(min)?;
    validate_precision(max)?;
    if min > max {
        return Err(GeoclusterError::InvalidInput(format!(
            "Precision range is empty: [{}, {}]",
            min, max
        )));
    }

    let horizontal = request.pixel_width / (request.annotation_width * 2.0);
    let vertical = request.pixel_height / (request.annotation_height * 2.0);
    let max_annotations_per_axis = horizontal.max(vertical);

    let bounds = request.bounds();
    let (axis, span) = if horizontal > vertical {
        (LimitingAxis::Longitude, bounds.lon_span())
    } else {
        (LimitingAxis::Latitude, bounds.lat_span())
    };
    let degrees_per_annotation = span / max_annotations_per_axis;

    // log2 of +inf (empty span) is +inf and clamps to `max`.
    let raw = (180.0 / degrees_per_annotation).log2().floor();
    let precision = raw.clamp(min as f64, max as f64) as usize;

    log::debug!(
        "Resolved precision {} (raw {}) from {:.6} degrees per annotation along {:?}",
        precision,
        raw,
        degrees_per_annotation,
        axis
    );

    Ok(Resolution {
        max_annotations_per_axis,
        axis,
        degrees_per_annotation,
        precision,
    })
}
