//! Compute layer: the geohash codec and the algorithms built on it.
//!
//! - `geohash`: cell encoding, decoding and grid-step neighbors
//! - `coverage`: cells covering a viewport rectangle
//! - `precision`: viewport-driven precision resolution
//! - `zones`: zone tree reduction and the cluster/point partition
//! - `validation`: input checks shared by all of the above
//!
//! Everything here is pure computation over request-scoped values and is
//! independent of where zone statistics and points come from.

pub mod coverage;
pub mod geohash;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod precision;
pub mod validation;
pub mod zones;
