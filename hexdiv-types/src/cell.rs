use crate::coord::Coordinate;
use geo::Polygon;
use serde::{Deserialize, Serialize};

/// Opaque identifier of one grid cell.
///
/// The value is scoped to the tessellation scheme and resolution that
/// produced it. Equality and hashing are over the raw value only, never over
/// geometry. Displayed as lowercase hexadecimal, which for H3 cells matches
/// the canonical H3 string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(u64);

impl CellId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for CellId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<CellId> for u64 {
    fn from(cell: CellId) -> Self {
        cell.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Grid cell-size tier. Higher values select finer cells.
///
/// The accepted range depends on the tessellation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resolution(u8);

impl Resolution {
    #[inline]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for Resolution {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tile of the tessellation: identifier plus closed boundary polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    /// Exterior ring in `geo` axis order (x = longitude); first vertex
    /// repeated at the end.
    pub boundary: Polygon<f64>,
}

impl Cell {
    pub fn new(id: CellId, boundary: Polygon<f64>) -> Self {
        Self { id, boundary }
    }

    /// Boundary vertices in ring order, closing vertex included.
    pub fn vertices(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.boundary.exterior().coords().map(|c| Coordinate::from(*c))
    }
}
