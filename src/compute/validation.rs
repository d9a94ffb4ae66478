//! Validation for coordinates, precisions, viewports and cell codes.
//!
//! Every check here fails with [`GeoclusterError::InvalidInput`] and a
//! message naming the violated constraint. Nothing is clamped silently.

use crate::compute::geohash::{MAX_PRECISION, base32_value};
use crate::error::{GeoclusterError, Result};
use geocluster_types::bbox::GeoBounds;
use geocluster_types::coord::Coordinate;
use geocluster_types::request::AnnotationRequest;

/// Validates a coordinate has a finite latitude in [-90, 90] and a finite
/// longitude in [-180, 180].
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_coordinate;
/// use geocluster_types::coord::Coordinate;
///
/// assert!(validate_coordinate(&Coordinate::new(48.8566, 2.3522)).is_ok());
/// assert!(validate_coordinate(&Coordinate::new(95.0, 2.0)).is_err());
/// assert!(validate_coordinate(&Coordinate::new(48.0, -181.0)).is_err());
/// ```
pub fn validate_coordinate(coord: &Coordinate) -> Result<()> {
    let (lat, lon) = (coord.latitude, coord.longitude);

    if !lat.is_finite() {
        return Err(GeoclusterError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lon.is_finite() {
        return Err(GeoclusterError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoclusterError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(GeoclusterError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    Ok(())
}

/// Validates a cell precision lies in `[min, max]`.
pub fn validate_precision_range(precision: usize, min: usize, max: usize) -> Result<()> {
    if !(min..=max).contains(&precision) {
        return Err(GeoclusterError::InvalidInput(format!(
            "Precision out of range [{}, {}]: {}",
            min, max, precision
        )));
    }
    Ok(())
}

/// Validates a codec precision, `[1, 17]`.
pub fn validate_precision(precision: usize) -> Result<()> {
    validate_precision_range(precision, 1, MAX_PRECISION)
}

/// Validates a cell code: length in `[1, 17]` and every character in the
/// geohash alphabet.
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_cell;
///
/// assert!(validate_cell("u09tvw").is_ok());
/// assert!(validate_cell("u09tva").is_err()); // 'a' is not in the alphabet
/// assert!(validate_cell("").is_err());
/// ```
pub fn validate_cell(hash: &str) -> Result<()> {
    if hash.len() > MAX_PRECISION {
        return Err(GeoclusterError::InvalidInput(format!(
            "Geohash length cannot be > {}: {:?} has {} characters",
            MAX_PRECISION,
            hash,
            hash.len()
        )));
    }
    if hash.is_empty() {
        return Err(GeoclusterError::InvalidInput(
            "Geohash cannot be empty".to_string(),
        ));
    }
    if let Some((idx, ch)) = hash
        .char_indices()
        .find(|(_, ch)| base32_value(*ch).is_none())
    {
        return Err(GeoclusterError::InvalidInput(format!(
            "Invalid geohash character {:?} at index {} in {:?}",
            ch, idx, hash
        )));
    }
    Ok(())
}

/// Validates a prefix used for point lookups: at most 17 characters from the
/// geohash alphabet. The empty prefix matches every cell and is accepted.
pub fn validate_cell_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Ok(());
    }
    validate_cell(prefix)
}

/// Validates both corners of a bounding rectangle.
pub fn validate_bounds(bounds: &GeoBounds) -> Result<()> {
    for (idx, corner) in [
        Coordinate::new(bounds.latitude_min, bounds.longitude_min),
        Coordinate::new(bounds.latitude_max, bounds.longitude_max),
    ]
    .iter()
    .enumerate()
    {
        validate_coordinate(corner).map_err(|e| {
            let which = if idx == 0 { "minimum" } else { "maximum" };
            GeoclusterError::InvalidInput(format!("Bounds {} corner: {}", which, e))
        })?;
    }
    Ok(())
}

fn validate_dimension(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeoclusterError::InvalidInput(format!(
            "{} must be a positive finite number, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates an annotation request: viewport corners in range, pixel and
/// annotation dimensions strictly positive.
pub fn validate_annotation_request(request: &AnnotationRequest) -> Result<()> {
    validate_bounds(&request.bounds())?;
    validate_dimension("pixelWidth", request.pixel_width)?;
    validate_dimension("pixelHeight", request.pixel_height)?;
    validate_dimension("annotationWidth", request.annotation_width)?;
    validate_dimension("annotationHeight", request.annotation_height)?;
    Ok(())
}
