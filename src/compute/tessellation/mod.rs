//! Pluggable tessellation schemes.
//!
//! A [`Tessellation`] maps coordinates to cells and cells to boundaries.
//! Grid generation, aggregation and classification only talk to this trait,
//! so the tiling can be swapped without touching them.

pub mod geohash;
pub mod hex;

pub use self::geohash::GeohashGrid;
pub use self::hex::HexGrid;

use crate::compute::grid::{self, Grid};
use crate::config::SamplingConfig;
use crate::error::Result;
use geo::Polygon;
use hexdiv_types::cell::{Cell, CellId, Resolution};
use hexdiv_types::coord::Coordinate;
use hexdiv_types::region::Region;
use smallvec::SmallVec;

/// Approximate length of one degree of latitude, in kilometres.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Neighbouring cells of one cell; hexagons have six, rectangles eight.
pub type Neighbors = SmallVec<[CellId; 8]>;

/// Smallest cell dimensions in degrees at one resolution and latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellExtent {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl CellExtent {
    /// Convert a length in kilometres to degrees at `latitude`.
    ///
    /// The cosine is clamped so extents stay finite at the poles.
    pub fn from_km(km: f64, latitude: f64) -> Self {
        let cos = latitude.to_radians().cos().abs().max(1e-6);
        Self {
            lat_deg: km / KM_PER_DEGREE,
            lon_deg: km / (KM_PER_DEGREE * cos),
        }
    }
}

/// A scheme for tiling the globe into cells at discrete resolutions.
pub trait Tessellation: Send + Sync {
    /// Short scheme name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Fails with `InvalidResolution` when the scheme has no such tier.
    fn validate_resolution(&self, resolution: Resolution) -> Result<()>;

    /// The single cell containing `coord`.
    ///
    /// Fails with `InvalidCoordinate` for non-finite or out-of-range input.
    fn locate(&self, coord: &Coordinate, resolution: Resolution) -> Result<CellId>;

    /// Closed boundary polygon of `cell` (x = longitude, y = latitude).
    ///
    /// Fails with `RenderingSkipped` when the identifier cannot be decoded.
    fn boundary(&self, cell: CellId) -> Result<Polygon<f64>>;

    /// `cell` together with its boundary.
    fn cell(&self, cell: CellId) -> Result<Cell> {
        Ok(Cell::new(cell, self.boundary(cell)?))
    }

    /// Cells sharing an edge or vertex with `cell`, excluding `cell` itself.
    fn neighbors(&self, cell: CellId) -> Result<Neighbors>;

    /// Lower bound on cell width and height near `latitude`.
    fn min_cell_extent(&self, resolution: Resolution, latitude: f64) -> Result<CellExtent>;

    /// The cells covering `region` at `resolution`.
    fn generate_cells(
        &self,
        region: &Region,
        resolution: Resolution,
        sampling: &SamplingConfig,
    ) -> Result<Grid> {
        grid::generate(self, region, resolution, sampling)
    }
}

impl<T: Tessellation + ?Sized> Tessellation for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn validate_resolution(&self, resolution: Resolution) -> Result<()> {
        (**self).validate_resolution(resolution)
    }

    fn locate(&self, coord: &Coordinate, resolution: Resolution) -> Result<CellId> {
        (**self).locate(coord, resolution)
    }

    fn boundary(&self, cell: CellId) -> Result<Polygon<f64>> {
        (**self).boundary(cell)
    }

    fn neighbors(&self, cell: CellId) -> Result<Neighbors> {
        (**self).neighbors(cell)
    }

    fn min_cell_extent(&self, resolution: Resolution, latitude: f64) -> Result<CellExtent> {
        (**self).min_cell_extent(resolution, latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extent_from_km_at_equator() {
        let extent = CellExtent::from_km(KM_PER_DEGREE, 0.0);
        assert_relative_eq!(extent.lat_deg, 1.0);
        assert_relative_eq!(extent.lon_deg, 1.0);
    }

    #[test]
    fn test_extent_widens_with_latitude() {
        let extent = CellExtent::from_km(KM_PER_DEGREE, 60.0);
        assert_relative_eq!(extent.lat_deg, 1.0);
        assert_relative_eq!(extent.lon_deg, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extent_finite_at_pole() {
        let extent = CellExtent::from_km(1.0, 90.0);
        assert!(extent.lon_deg.is_finite());
    }

    #[test]
    fn test_schemes_are_interchangeable() {
        let schemes: Vec<Box<dyn Tessellation>> = vec![Box::new(HexGrid), Box::new(GeohashGrid)];
        let coord = Coordinate::new(37.7749, -122.4194);

        for scheme in &schemes {
            let resolution = Resolution::new(6);
            let cell = scheme.locate(&coord, resolution).unwrap();
            assert_eq!(scheme.locate(&coord, resolution).unwrap(), cell);
            let tile = scheme.cell(cell).unwrap();
            assert_eq!(tile.id, cell);
            assert!(tile.vertices().count() >= 4, "{}", scheme.name());
        }
    }
}
