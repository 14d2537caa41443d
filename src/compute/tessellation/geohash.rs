//! Rectangular tessellation backed by geohash cells.
//!
//! Resolution is the geohash length (1 to 12 characters). Hashes are packed
//! into a [`CellId`] as 5 bits per character, with the length in the low
//! 4 bits, so identifiers of different lengths never collide.

use super::{CellExtent, Neighbors, Tessellation};
use crate::compute::validation::validate_coordinate;
use crate::error::{HexDivError, Result};
use geo::{Polygon, Rect};
use hexdiv_types::cell::{CellId, Resolution};
use hexdiv_types::coord::Coordinate;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";
const MAX_PRECISION: u8 = 12;

/// Geohash grid of axis-aligned rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeohashGrid;

impl GeohashGrid {
    fn precision(resolution: Resolution) -> Result<usize> {
        match resolution.get() {
            1..=MAX_PRECISION => Ok(resolution.get() as usize),
            other => Err(HexDivError::InvalidResolution(format!(
                "geohash precision must be in [1, {}], got {}",
                MAX_PRECISION, other
            ))),
        }
    }

    /// Pack a geohash string into a cell identifier.
    pub fn pack(hash: &str) -> Option<CellId> {
        if hash.is_empty() || hash.len() > MAX_PRECISION as usize {
            return None;
        }

        let mut bits: u64 = 0;
        for byte in hash.bytes() {
            let digit = BASE32.iter().position(|b| *b == byte)? as u64;
            bits = (bits << 5) | digit;
        }

        Some(CellId::new((bits << 4) | hash.len() as u64))
    }

    /// Recover the geohash string of a packed identifier.
    pub fn unpack(cell: CellId) -> Option<String> {
        let raw = cell.raw();
        let len = (raw & 0xf) as usize;
        if len == 0 || len > MAX_PRECISION as usize {
            return None;
        }

        let bits = raw >> 4;
        if len < MAX_PRECISION as usize && bits >> (5 * len) != 0 {
            return None;
        }

        let hash = (0..len)
            .rev()
            .map(|i| BASE32[((bits >> (5 * i)) & 0x1f) as usize] as char)
            .collect();
        Some(hash)
    }

    fn hash_of(cell: CellId) -> Result<String> {
        Self::unpack(cell).ok_or_else(|| HexDivError::RenderingSkipped {
            cell,
            reason: "not a packed geohash".to_string(),
        })
    }
}

impl Tessellation for GeohashGrid {
    fn name(&self) -> &'static str {
        "geohash"
    }

    fn validate_resolution(&self, resolution: Resolution) -> Result<()> {
        Self::precision(resolution).map(|_| ())
    }

    fn locate(&self, coord: &Coordinate, resolution: Resolution) -> Result<CellId> {
        validate_coordinate(coord)?;
        let precision = Self::precision(resolution)?;

        let hash = ::geohash::encode(
            ::geohash::Coord {
                x: coord.lon(),
                y: coord.lat(),
            },
            precision,
        )
        .map_err(|e| HexDivError::InvalidCoordinate(format!("{}: {}", coord, e)))?;

        Self::pack(&hash).ok_or_else(|| {
            HexDivError::InvalidCoordinate(format!("{}: unexpected geohash {:?}", coord, hash))
        })
    }

    fn boundary(&self, cell: CellId) -> Result<Polygon<f64>> {
        let hash = Self::hash_of(cell)?;
        let bbox = ::geohash::decode_bbox(&hash).map_err(|e| HexDivError::RenderingSkipped {
            cell,
            reason: e.to_string(),
        })?;

        let rect = Rect::new(
            geo::coord! { x: bbox.min().x, y: bbox.min().y },
            geo::coord! { x: bbox.max().x, y: bbox.max().y },
        );
        Ok(rect.to_polygon())
    }

    fn neighbors(&self, cell: CellId) -> Result<Neighbors> {
        let hash = Self::hash_of(cell)?;
        let around = ::geohash::neighbors(&hash).map_err(|e| HexDivError::RenderingSkipped {
            cell,
            reason: e.to_string(),
        })?;

        let mut neighbors = Neighbors::new();
        for hash in [
            around.n, around.ne, around.e, around.se, around.s, around.sw, around.w, around.nw,
        ] {
            if let Some(id) = Self::pack(&hash)
                && id != cell
                && !neighbors.contains(&id)
            {
                neighbors.push(id);
            }
        }
        Ok(neighbors)
    }

    /// Exact cell size: latitude gets the floor half of the hash bits.
    fn min_cell_extent(&self, resolution: Resolution, _latitude: f64) -> Result<CellExtent> {
        let bits = 5 * Self::precision(resolution)? as i32;
        let lat_bits = bits / 2;
        let lon_bits = bits - lat_bits;

        Ok(CellExtent {
            lat_deg: 180.0 / 2f64.powi(lat_bits),
            lon_deg: 360.0 / 2f64.powi(lon_bits),
        })
    }
}
