//! Hexagonal tessellation backed by the H3 grid system.

use super::{CellExtent, Neighbors, Tessellation};
use crate::compute::validation::validate_coordinate;
use crate::error::{HexDivError, Result};
use geo::{LineString, Polygon};
use h3o::{CellIndex, LatLng};
use hexdiv_types::cell::{CellId, Resolution};
use hexdiv_types::coord::Coordinate;

/// H3 hexagonal grid. Resolutions 0 (coarsest) to 15 (finest).
///
/// # Examples
///
/// ```
/// use hexdiv::compute::tessellation::{HexGrid, Tessellation};
/// use hexdiv::{Coordinate, Resolution};
///
/// let grid = HexGrid;
/// let cell = grid.locate(&Coordinate::new(37.7749, -122.4194), Resolution::new(7))?;
/// assert_eq!(cell.to_string().len(), 15);
/// # Ok::<(), hexdiv::HexDivError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexGrid;

impl HexGrid {
    fn h3_resolution(resolution: Resolution) -> Result<h3o::Resolution> {
        h3o::Resolution::try_from(resolution.get()).map_err(|e| {
            HexDivError::InvalidResolution(format!(
                "H3 resolution must be in [0, 15], got {}: {}",
                resolution, e
            ))
        })
    }

    fn cell_index(cell: CellId) -> Result<CellIndex> {
        CellIndex::try_from(cell.raw()).map_err(|e| HexDivError::RenderingSkipped {
            cell,
            reason: format!("not a valid H3 index: {}", e),
        })
    }
}

impl Tessellation for HexGrid {
    fn name(&self) -> &'static str {
        "h3"
    }

    fn validate_resolution(&self, resolution: Resolution) -> Result<()> {
        Self::h3_resolution(resolution).map(|_| ())
    }

    fn locate(&self, coord: &Coordinate, resolution: Resolution) -> Result<CellId> {
        validate_coordinate(coord)?;
        let resolution = Self::h3_resolution(resolution)?;

        let latlng = LatLng::new(coord.lat(), coord.lon())
            .map_err(|e| HexDivError::InvalidCoordinate(format!("{}: {}", coord, e)))?;

        Ok(CellId::new(u64::from(latlng.to_cell(resolution))))
    }

    fn boundary(&self, cell: CellId) -> Result<Polygon<f64>> {
        let index = Self::cell_index(cell)?;
        let ring: Vec<geo::Coord<f64>> = index
            .boundary()
            .iter()
            .map(|vertex| geo::coord! { x: vertex.lng(), y: vertex.lat() })
            .collect();

        if ring.len() < 3 {
            return Err(HexDivError::RenderingSkipped {
                cell,
                reason: format!("boundary has only {} vertices", ring.len()),
            });
        }

        Ok(Polygon::new(LineString::from(ring), vec![]))
    }

    fn neighbors(&self, cell: CellId) -> Result<Neighbors> {
        let index = Self::cell_index(cell)?;
        let disk: Vec<CellIndex> = index.grid_disk(1);

        Ok(disk
            .into_iter()
            .filter(|neighbor| *neighbor != index)
            .map(|neighbor| CellId::new(u64::from(neighbor)))
            .collect())
    }

    /// Uses the average edge length, which stays below the flat-to-flat
    /// width of the smallest hexagon at every resolution.
    fn min_cell_extent(&self, resolution: Resolution, latitude: f64) -> Result<CellExtent> {
        let resolution = Self::h3_resolution(resolution)?;
        Ok(CellExtent::from_km(resolution.edge_length_km(), latitude))
    }
}
