//! Pipeline builder
//!
//! Collects configuration step by step and validates it once in
//! [`PipelineBuilder::build`].

use crate::compute::tessellation::{HexGrid, Tessellation};
use crate::config::{Config, ProviderConfig, SamplingConfig};
use crate::error::Result;
use crate::pipeline::Pipeline;

/// Builder for a [`Pipeline`] over any tessellation.
#[derive(Debug, Clone)]
pub struct PipelineBuilder<T = HexGrid> {
    tessellation: T,
    config: Config,
}

impl<T: Tessellation> PipelineBuilder<T> {
    /// Start from the default configuration over `tessellation`.
    pub fn new(tessellation: T) -> Self {
        Self {
            tessellation,
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn resolution(mut self, resolution: u8) -> Self {
        self.config = self.config.with_resolution(resolution);
        self
    }

    /// Minimum number of distinct categories for a highlighted cell.
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config = self.config.with_threshold(threshold);
        self
    }

    pub fn sampling(mut self, sampling: SamplingConfig) -> Self {
        self.config = self.config.with_sampling(sampling);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config = self.config.with_parallel(parallel);
        self
    }

    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.config = self.config.with_provider(provider);
        self
    }

    /// Swap the tessellation, keeping the configuration.
    pub fn tessellation<U: Tessellation>(self, tessellation: U) -> PipelineBuilder<U> {
        PipelineBuilder {
            tessellation,
            config: self.config,
        }
    }

    /// Validate the configuration against the tessellation and build.
    pub fn build(self) -> Result<Pipeline<T>> {
        Pipeline::new(self.tessellation, self.config)
    }
}

impl Default for PipelineBuilder<HexGrid> {
    fn default() -> Self {
        Self::new(HexGrid)
    }
}
