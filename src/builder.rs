//! Engine builder
//!
//! Wires a configuration and the two data sources into a [`ClusterEngine`].
//! A single value implementing both traits, such as [`MemorySource`], can be
//! passed once through [`EngineBuilder::source`].

use crate::config::Config;
use crate::engine::ClusterEngine;
use crate::error::{GeoclusterError, Result};
use crate::source::{PointLookup, ZoneSource};
use std::sync::Arc;

#[cfg(doc)]
use crate::source::MemorySource;

/// Builder for a [`ClusterEngine`] with custom sources and settings.
pub struct EngineBuilder {
    config: Config,
    zone_source: Option<Arc<dyn ZoneSource>>,
    point_lookup: Option<Arc<dyn PointLookup>>,
}

impl EngineBuilder {
    /// Create a builder with default configuration and no sources.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            zone_source: None,
            point_lookup: None,
        }
    }

    /// Set the engine configuration (precision range, thresholds, caps).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn zone_source(mut self, source: Arc<dyn ZoneSource>) -> Self {
        self.zone_source = Some(source);
        self
    }

    pub fn point_lookup(mut self, lookup: Arc<dyn PointLookup>) -> Self {
        self.point_lookup = Some(lookup);
        self
    }

    /// Use one value as both the zone source and the point lookup.
    pub fn source<S>(mut self, source: Arc<S>) -> Self
    where
        S: ZoneSource + PointLookup + 'static,
    {
        self.zone_source = Some(source.clone());
        self.point_lookup = Some(source);
        self
    }

    /// Build the engine. Fails on an invalid configuration or a missing source.
    pub fn build(self) -> Result<ClusterEngine> {
        self.config.validate()?;

        let zones = self
            .zone_source
            .ok_or_else(|| GeoclusterError::Config("No zone source configured".to_string()))?;
        let points = self
            .point_lookup
            .ok_or_else(|| GeoclusterError::Config("No point lookup configured".to_string()))?;

        log::debug!("Built cluster engine with {:?}", self.config);

        Ok(ClusterEngine {
            config: self.config,
            zones,
            points,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .field("zone_source", &self.zone_source.is_some())
            .field("point_lookup", &self.point_lookup.is_some())
            .finish()
    }
}
