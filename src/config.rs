//! Pipeline configuration.
//!
//! Every field has a serde default, so partial JSON/TOML documents are
//! accepted; unknown fields are rejected.

use crate::error::{HexDivError, Result};
use hexdiv_types::cell::Resolution;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest accepted highlight threshold.
pub const MIN_THRESHOLD: u32 = 1;
/// Largest accepted highlight threshold.
pub const MAX_THRESHOLD: u32 = 50;

/// Top-level configuration for a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Grid resolution; the valid range depends on the tessellation.
    #[serde(default = "Config::default_resolution")]
    pub resolution: u8,

    /// Minimum number of distinct categories for a cell to be highlighted.
    #[serde(default = "Config::default_threshold")]
    pub threshold: u32,

    /// Bin features on the rayon pool when the `parallel` feature is built.
    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Lattice sampling used by grid generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    /// Lattice step as a fraction of the smallest cell extent, in (0, 1].
    #[serde(default = "SamplingConfig::default_step_fraction")]
    pub step_fraction: f64,

    /// Upper bound on lattice points per run.
    #[serde(default = "SamplingConfig::default_max_samples")]
    pub max_samples: u64,

    /// Add neighbouring cells that overlap the region but that no lattice
    /// point landed in. Without it, cells clipping the region edge with a
    /// sliver thinner than the lattice step are missed.
    #[serde(default = "SamplingConfig::default_refine_edges")]
    pub refine_edges: bool,
}

impl SamplingConfig {
    const fn default_step_fraction() -> f64 {
        0.5
    }

    const fn default_max_samples() -> u64 {
        4_000_000
    }

    const fn default_refine_edges() -> bool {
        true
    }

    pub fn with_step_fraction(mut self, fraction: f64) -> Self {
        self.step_fraction = fraction;
        self
    }

    pub fn with_max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_refine_edges(mut self, refine: bool) -> Self {
        self.refine_edges = refine;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step_fraction > 0.0 && self.step_fraction <= 1.0) {
            return Err(HexDivError::Config(format!(
                "sampling.step_fraction must be in (0, 1], got: {}",
                self.step_fraction
            )));
        }
        if self.max_samples == 0 {
            return Err(HexDivError::Config(
                "sampling.max_samples must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            step_fraction: Self::default_step_fraction(),
            max_samples: Self::default_max_samples(),
            refine_edges: Self::default_refine_edges(),
        }
    }
}

/// Settings for remote feature providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "ProviderConfig::default_endpoint")]
    pub endpoint: String,

    /// OSM tag whose value becomes the feature category.
    #[serde(default = "ProviderConfig::default_category_tag")]
    pub category_tag: String,

    #[serde(default = "ProviderConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    fn default_endpoint() -> String {
        "http://overpass-api.de/api/interpreter".to_string()
    }

    fn default_category_tag() -> String {
        "amenity".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_category_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tag = tag.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(HexDivError::Config(
                "provider.endpoint must not be empty".to_string(),
            ));
        }
        if self.category_tag.trim().is_empty() {
            return Err(HexDivError::Config(
                "provider.category_tag must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HexDivError::Config(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            category_tag: Self::default_category_tag(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl Config {
    const fn default_resolution() -> u8 {
        7
    }

    const fn default_threshold() -> u32 {
        3
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.resolution)
    }

    pub fn with_resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        #[cfg(not(feature = "parallel"))]
        if parallel {
            log::warn!("Parallel aggregation requested but the `parallel` feature is disabled");
        }
        self.parallel = parallel;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    /// Check every field. Resolution range is checked by the tessellation.
    pub fn validate(&self) -> Result<()> {
        crate::compute::validation::validate_threshold(self.threshold)?;
        self.sampling.validate()?;
        self.provider.validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| HexDivError::Config(format!("Failed to parse JSON config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| HexDivError::Config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HexDivError::Serialization(e.to_string()))
    }

    /// Load a config file, picking the format from its extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents),
            other => Err(HexDivError::Config(format!(
                "Unsupported config file extension: {:?}",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: Self::default_resolution(),
            threshold: Self::default_threshold(),
            parallel: false,
            sampling: SamplingConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}
