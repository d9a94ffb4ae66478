//! # geocluster-types
//!
//! Data types exchanged with the geocluster engine.
//!
//! - **Coordinates and bounds**: `Coordinate`, `GeoBounds`
//! - **Zones**: `ZoneStat`, the per-cell aggregate fed into clustering
//! - **Points**: `PointRecord`, `PointMeta`
//! - **Requests and results**: `AnnotationRequest`, `PointQuery`, `ClusterResult`
//!
//! All types are serializable with Serde. Coordinates convert to and from the
//! `geo` crate's `Point` (x = longitude, y = latitude).
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::bbox::GeoBounds;
//! use geocluster_types::coord::Coordinate;
//!
//! let paris = GeoBounds::new(48.80, 2.25, 48.91, 2.42);
//! assert!(paris.contains(&Coordinate::new(48.8566, 2.3522)));
//! ```

pub mod bbox;
pub mod coord;
pub mod point;
pub mod request;
pub mod zone;
