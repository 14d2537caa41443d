//! Error types for the aggregation pipeline.

use hexdiv_types::cell::CellId;
use thiserror::Error;

/// Errors raised by grid generation, indexing, providers and configuration.
///
/// Global input errors (`InvalidRegion`, `InvalidResolution`,
/// `InvalidThreshold`, `SamplingLimitExceeded`, `Config`) abort a run before
/// any work is done. `InvalidCoordinate` and `RenderingSkipped` concern a
/// single feature or cell and are recovered locally by the pipeline.
/// `ProviderUnavailable` is recovered by substituting an empty feature list.
#[derive(Debug, Error)]
pub enum HexDivError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Sampling lattice needs {samples} points, limit is {limit}")]
    SamplingLimitExceeded { samples: u64, limit: u64 },

    #[error("Feature provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Boundary of cell {cell} skipped: {reason}")]
    RenderingSkipped { cell: CellId, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for HexDivError {
    fn from(err: serde_json::Error) -> Self {
        HexDivError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HexDivError>;
