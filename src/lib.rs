//! Hexagonal aggregation of point features with per-cell category diversity.
//!
//! A region is tiled into cells, every feature is binned into the cell that
//! contains it, and each cell is flagged when it holds at least `threshold`
//! distinct categories.
//!
//! ```rust
//! use hexdiv::{Feature, Pipeline, Region};
//!
//! let pipeline = Pipeline::builder().resolution(8).threshold(2).build()?;
//! let region = Region::new(37.77, -122.42, 37.78, -122.41);
//! let features = vec![
//!     Feature::new(37.775, -122.415, "cafe"),
//!     Feature::new(37.775, -122.415, "library"),
//!     Feature::uncategorized(37.775, -122.415),
//! ];
//!
//! let result = pipeline.run(&region, &features)?;
//! assert_eq!(result.total_count(), 2);
//! assert_eq!(result.highlighted_count(), 1);
//! # Ok::<(), hexdiv::HexDivError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod regions;

pub use builder::PipelineBuilder;
pub use config::{Config, ProviderConfig, SamplingConfig};
pub use error::{HexDivError, Result};
pub use pipeline::{CellRecord, Diagnostic, Pipeline, ResultSet};

pub use compute::{
    AggregationReport, Classifier, FrequencyTable, GeohashGrid, Grid, HexGrid, Tessellation,
};
pub use compute::geojson::result_set_to_geojson;

pub use provider::{FeatureProvider, StaticProvider};
#[cfg(feature = "overpass")]
pub use provider::OverpassProvider;

pub use hexdiv_types::cell::{Cell, CellId, Resolution};
pub use hexdiv_types::coord::Coordinate;
pub use hexdiv_types::feature::Feature;
pub use hexdiv_types::region::Region;

pub use geo::Polygon;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{HexDivError, Pipeline, PipelineBuilder, Result, ResultSet};

    pub use crate::{Coordinate, Feature, Region, Resolution};

    pub use crate::{Config, ProviderConfig, SamplingConfig};

    pub use crate::{FeatureProvider, StaticProvider};

    pub use crate::{GeohashGrid, HexGrid, Tessellation};

    #[cfg(feature = "overpass")]
    pub use crate::OverpassProvider;
}
