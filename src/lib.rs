//! Geohash tiling and adaptive map clustering.
//!
//! Given a map viewport, the engine picks a cell precision, enumerates the
//! covering cells and decides which zones are drawn as cluster markers and
//! which are expanded into individual points.
//!
//! ```rust
//! use geocluster::{AnnotationRequest, Coordinate, EngineBuilder, GeoBounds, MemorySource};
//! use std::sync::Arc;
//!
//! let source = Arc::new(MemorySource::new());
//! for _ in 0..8 {
//!     source.add_point("bikes", "dock", Coordinate::new(45.7640, 4.8357))?;
//! }
//! source.add_point("bikes", "lone dock", Coordinate::new(48.8566, 2.3522))?;
//!
//! let engine = EngineBuilder::new().source(source).build()?;
//! let request = AnnotationRequest::new(
//!     GeoBounds::new(40.0, 0.0, 50.0, 10.0),
//!     (800.0, 800.0),
//!     (40.0, 40.0),
//! );
//! let result = engine.annotations("bikes", &request)?;
//! assert_eq!(result.clusters.len(), 1);
//! assert_eq!(result.points.len(), 1);
//! # Ok::<(), geocluster::GeoclusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;

pub use builder::EngineBuilder;
pub use config::Config;
pub use engine::ClusterEngine;
pub use error::{GeoclusterError, Result};

pub use compute::geohash::{GeoCell, MAX_PRECISION, decode, decode_bounds, encode};
pub use compute::precision::{LimitingAxis, Resolution};

pub use source::{MemorySource, PointLookup, SourceStats, ZoneSource};

pub use geocluster_types::bbox::GeoBounds;
pub use geocluster_types::coord::Coordinate;
pub use geocluster_types::point::{PointMeta, PointRecord};
pub use geocluster_types::request::{AnnotationRequest, PointQuery};
pub use geocluster_types::zone::{ClusterResult, ZoneStat};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterEngine, EngineBuilder, GeoclusterError, Result};

    pub use crate::{Config, MemorySource, PointLookup, ZoneSource};

    pub use crate::{GeoCell, decode, encode};

    pub use crate::{AnnotationRequest, ClusterResult, Coordinate, GeoBounds, PointQuery, ZoneStat};
}
