//! # hexdiv-types
//!
//! Core data types for the hexdiv aggregation pipeline.
//!
//! - **Coordinates**: `Coordinate` (latitude/longitude in decimal degrees)
//! - **Regions**: `Region`, the rectangular bounding box a grid is generated over
//! - **Cells**: `CellId`, `Resolution`, `Cell`
//! - **Features**: `Feature`, a point observation with an optional category label
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use hexdiv_types::coord::Coordinate;
//! use hexdiv_types::feature::Feature;
//! use hexdiv_types::region::Region;
//!
//! let region = Region::new(37.7045, -122.527, 37.8122, -122.3493);
//! let cafe = Feature::new(37.7749, -122.4194, "cafe");
//!
//! assert!(region.contains(&cafe.coordinate()));
//! assert_eq!(cafe.label(), Some("cafe"));
//! ```

pub mod cell;
pub mod coord;
pub mod feature;
pub mod region;
