//! Grid generation by lattice sampling.
//!
//! A regular lattice spanning the region (edges included) is mapped point by
//! point through [`Tessellation::locate`]; the distinct cells hit form the
//! grid. The lattice step is a fraction of the smallest cell extent, so every
//! cell with a reasonable share of the region is sampled at least once.

use crate::compute::tessellation::Tessellation;
use crate::compute::validation::validate_region;
use crate::config::SamplingConfig;
use crate::error::{HexDivError, Result};
use geo::Relate;
use hexdiv_types::cell::{CellId, Resolution};
use hexdiv_types::coord::Coordinate;
use hexdiv_types::region::Region;
use std::collections::BTreeSet;

/// The set of cells covering one `(Region, Resolution)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    resolution: Resolution,
    cells: BTreeSet<CellId>,
}

impl Grid {
    pub fn new(resolution: Resolution, cells: BTreeSet<CellId>) -> Self {
        Self { resolution, cells }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn contains(&self, cell: &CellId) -> bool {
        self.cells.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CellId> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &BTreeSet<CellId> {
        &self.cells
    }
}

/// Evenly spaced sample points spanning a region, both ends included.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    region: Region,
    lat_points: usize,
    lon_points: usize,
}

impl Lattice {
    /// Build a lattice whose spacing is at most `lat_step` / `lon_step`.
    pub fn new(region: &Region, lat_step: f64, lon_step: f64, max_samples: u64) -> Result<Self> {
        for (axis, step) in [("latitude", lat_step), ("longitude", lon_step)] {
            if !(step.is_finite() && step > 0.0) {
                return Err(HexDivError::Config(format!(
                    "Lattice {} step must be finite and positive, got: {}",
                    axis, step
                )));
            }
        }

        let lat_points = Self::points_along(region.lat_span(), lat_step);
        let lon_points = Self::points_along(region.lon_span(), lon_step);

        let samples = lat_points * lon_points;
        if !samples.is_finite() || samples > max_samples as f64 {
            return Err(HexDivError::SamplingLimitExceeded {
                samples: if samples.is_finite() {
                    samples as u64
                } else {
                    u64::MAX
                },
                limit: max_samples,
            });
        }

        Ok(Self {
            region: *region,
            lat_points: lat_points as usize,
            lon_points: lon_points as usize,
        })
    }

    /// Number of points needed along one axis, at least two.
    fn points_along(span: f64, step: f64) -> f64 {
        ((span / step).ceil() + 1.0).max(2.0)
    }

    pub fn len(&self) -> usize {
        self.lat_points * self.lon_points
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.lat_points, self.lon_points)
    }

    /// Lattice points, row by row from the south-west corner.
    pub fn points(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.lat_points).flat_map(move |i| {
            let lat = Self::interpolate(self.region.lat_min, self.region.lat_max, i, self.lat_points);
            (0..self.lon_points).map(move |j| {
                let lon =
                    Self::interpolate(self.region.lon_min, self.region.lon_max, j, self.lon_points);
                Coordinate::new(lat, lon)
            })
        })
    }

    /// The last index maps exactly to `max` so the far edge is always sampled.
    fn interpolate(min: f64, max: f64, index: usize, count: usize) -> f64 {
        if index + 1 >= count {
            max
        } else {
            min + (max - min) * index as f64 / (count - 1) as f64
        }
    }
}

/// Build the sampling lattice for `region` at `resolution`.
pub fn lattice<T: Tessellation + ?Sized>(
    tessellation: &T,
    region: &Region,
    resolution: Resolution,
    sampling: &SamplingConfig,
) -> Result<Lattice> {
    let extent = tessellation.min_cell_extent(resolution, region.lat_nearest_equator())?;
    Lattice::new(
        region,
        extent.lat_deg * sampling.step_fraction,
        extent.lon_deg * sampling.step_fraction,
        sampling.max_samples,
    )
}

/// Generate the cells covering `region` at `resolution`.
///
/// Deterministic: identical inputs give identical grids. A near-zero region
/// still yields at least one cell, since the lattice always has corners.
pub fn generate<T: Tessellation + ?Sized>(
    tessellation: &T,
    region: &Region,
    resolution: Resolution,
    sampling: &SamplingConfig,
) -> Result<Grid> {
    validate_region(region)?;
    tessellation.validate_resolution(resolution)?;
    sampling.validate()?;

    let lattice = lattice(tessellation, region, resolution, sampling)?;
    if lattice.len() > 1_000_000 {
        log::warn!(
            "Sampling {} lattice points for {} resolution {}",
            lattice.len(),
            tessellation.name(),
            resolution
        );
    }

    let mut cells = BTreeSet::new();
    for point in lattice.points() {
        cells.insert(tessellation.locate(&point, resolution)?);
    }

    let sampled = cells.len();
    if sampling.refine_edges {
        refine_edges(tessellation, region, &mut cells);
    }

    log::debug!(
        "Generated {} {} cells at resolution {} from {} samples ({} added by edge refinement)",
        cells.len(),
        tessellation.name(),
        resolution,
        lattice.len(),
        cells.len() - sampled
    );

    Ok(Grid::new(resolution, cells))
}

/// Grow `cells` with neighbours whose interior overlaps the region.
///
/// Neighbours that only share an edge or vertex with the region are left
/// out, as are cells whose boundary cannot be computed (logged).
fn refine_edges<T: Tessellation + ?Sized>(
    tessellation: &T,
    region: &Region,
    cells: &mut BTreeSet<CellId>,
) {
    let rect = region.to_rect();
    let mut rejected = BTreeSet::new();
    let mut frontier: Vec<CellId> = cells.iter().copied().collect();

    while let Some(cell) = frontier.pop() {
        let neighbors = match tessellation.neighbors(cell) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                log::warn!("Edge refinement stopped at cell {}: {}", cell, e);
                continue;
            }
        };

        for neighbor in neighbors {
            if cells.contains(&neighbor) || rejected.contains(&neighbor) {
                continue;
            }

            match tessellation.boundary(neighbor) {
                Ok(boundary) if overlaps(&boundary, &rect) => {
                    cells.insert(neighbor);
                    frontier.push(neighbor);
                }
                Ok(_) => {
                    rejected.insert(neighbor);
                }
                Err(e) => {
                    log::warn!("Edge refinement skipped cell {}: {}", neighbor, e);
                    rejected.insert(neighbor);
                }
            }
        }
    }
}

fn overlaps(boundary: &geo::Polygon<f64>, rect: &geo::Rect<f64>) -> bool {
    let matrix = boundary.relate(rect);
    matrix.is_intersects() && !matrix.is_touches()
}
