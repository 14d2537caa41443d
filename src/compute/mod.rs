//! Grid generation, aggregation, classification, validation and GeoJSON export.

pub mod aggregate;
pub mod classify;
pub mod geojson;
pub mod grid;
pub mod tessellation;
pub mod validation;

pub use aggregate::{Aggregation, AggregationReport, Aggregator, FrequencyTable};
pub use classify::{Classification, Classifier};
pub use grid::{Grid, Lattice};
pub use tessellation::{CellExtent, GeohashGrid, HexGrid, Tessellation};
