//! Engine configuration.
//!
//! Every threshold the clustering pipeline relies on is a named field here
//! with the historical value as its default.
use crate::compute::coverage::DEFAULT_MAX_COVERAGE_CELLS;
use crate::compute::geohash::MAX_PRECISION;
use crate::compute::precision::{DEFAULT_MAX_ANNOTATION_PRECISION, DEFAULT_MIN_ANNOTATION_PRECISION};
use crate::compute::zones::{
    DEFAULT_LOW_COUNT_THRESHOLD, DEFAULT_MAX_POINTS_PER_ZONE, DEFAULT_SUPPRESSION_FLOOR,
};
use crate::error::{GeoclusterError, Result};
use serde::de::Error;
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Coarsest precision the resolver will pick for a viewport
    #[serde(default = "Config::default_min_precision")]
    pub min_precision: usize,

    /// Finest precision the resolver will pick; zones at this level are
    /// always returned as individual points
    #[serde(default = "Config::default_max_precision")]
    pub max_precision: usize,

    /// Shortest ancestor prefix consulted when suppressing nested zones
    #[serde(default = "Config::default_suppression_floor")]
    pub suppression_floor: usize,

    /// Zones with at most this many points are shown as points
    #[serde(default = "Config::default_low_count_threshold")]
    pub low_count_threshold: u64,

    /// Zones denser than this are left out of the zone listing
    #[serde(default = "Config::default_max_points_per_zone")]
    pub max_points_per_zone: u64,

    /// Maximum number of zones in one zone listing
    #[serde(default = "Config::default_max_zone_count")]
    pub max_zone_count: usize,

    /// Maximum number of prefixes a viewport coverage may produce before
    /// the prefix level is coarsened
    #[serde(default = "Config::default_max_coverage_cells")]
    pub max_coverage_cells: u64,

    /// Maximum page size for point listings
    #[serde(default = "Config::default_max_page_size")]
    pub max_page_size: usize,
}

impl Config {
    const fn default_min_precision() -> usize {
        DEFAULT_MIN_ANNOTATION_PRECISION
    }

    const fn default_max_precision() -> usize {
        DEFAULT_MAX_ANNOTATION_PRECISION
    }

    const fn default_suppression_floor() -> usize {
        DEFAULT_SUPPRESSION_FLOOR
    }

    const fn default_low_count_threshold() -> u64 {
        DEFAULT_LOW_COUNT_THRESHOLD
    }

    const fn default_max_points_per_zone() -> u64 {
        DEFAULT_MAX_POINTS_PER_ZONE
    }

    const fn default_max_zone_count() -> usize {
        200
    }

    const fn default_max_coverage_cells() -> u64 {
        DEFAULT_MAX_COVERAGE_CELLS
    }

    const fn default_max_page_size() -> usize {
        50
    }

    pub fn with_precision_range(mut self, min: usize, max: usize) -> Self {
        self.min_precision = min;
        self.max_precision = max;
        self
    }

    pub fn with_suppression_floor(mut self, floor: usize) -> Self {
        self.suppression_floor = floor;
        self
    }

    pub fn with_low_count_threshold(mut self, threshold: u64) -> Self {
        self.low_count_threshold = threshold;
        self
    }

    pub fn with_max_points_per_zone(mut self, max: u64) -> Self {
        self.max_points_per_zone = max;
        self
    }

    pub fn with_max_zone_count(mut self, max: usize) -> Self {
        assert!(max > 0, "Max zone count must be greater than zero");
        self.max_zone_count = max;
        self
    }

    pub fn with_max_coverage_cells(mut self, max: u64) -> Self {
        assert!(max > 0, "Coverage cell budget must be greater than zero");
        if max > 1_000_000 {
            log::warn!(
                "Coverage budget of {} cells is very large; every cell becomes a prefix \
                sent to the zone statistics source.",
                max
            );
        }
        self.max_coverage_cells = max;
        self
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        assert!(max > 0, "Page size must be greater than zero");
        self.max_page_size = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        // The annotation pipeline looks zones up under prefixes one level coarser.
        if self.min_precision < 2 {
            return Err(GeoclusterError::Config(format!(
                "min_precision must be at least 2, got {}",
                self.min_precision
            )));
        }
        if self.max_precision > MAX_PRECISION {
            return Err(GeoclusterError::Config(format!(
                "max_precision cannot exceed {}, got {}",
                MAX_PRECISION, self.max_precision
            )));
        }
        if self.min_precision > self.max_precision {
            return Err(GeoclusterError::Config(format!(
                "min_precision ({}) is greater than max_precision ({})",
                self.min_precision, self.max_precision
            )));
        }
        if self.suppression_floor == 0 {
            return Err(GeoclusterError::Config(
                "suppression_floor must be greater than zero".to_string(),
            ));
        }
        if self.max_zone_count == 0 {
            return Err(GeoclusterError::Config(
                "max_zone_count must be greater than zero".to_string(),
            ));
        }
        if self.max_coverage_cells == 0 {
            return Err(GeoclusterError::Config(
                "max_coverage_cells must be greater than zero".to_string(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(GeoclusterError::Config(
                "max_page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file; `.toml` files need the `toml` feature,
    /// anything else is parsed as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| GeoclusterError::Toml(e.to_string()))
            }
            #[cfg(not(feature = "toml"))]
            Some("toml") => Err(GeoclusterError::Config(format!(
                "{} is a TOML file but the `toml` feature is disabled",
                path.display()
            ))),
            _ => Ok(Self::from_json(&contents)?),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_precision: Self::default_min_precision(),
            max_precision: Self::default_max_precision(),
            suppression_floor: Self::default_suppression_floor(),
            low_count_threshold: Self::default_low_count_threshold(),
            max_points_per_zone: Self::default_max_points_per_zone(),
            max_zone_count: Self::default_max_zone_count(),
            max_coverage_cells: Self::default_max_coverage_cells(),
            max_page_size: Self::default_max_page_size(),
        }
    }
}
