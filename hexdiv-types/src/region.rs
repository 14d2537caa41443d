use crate::coord::Coordinate;
use geo::{Polygon, Rect};
use serde::{Deserialize, Serialize};

/// A rectangular bounding box in latitude/longitude.
///
/// Bounds are stored as given. Unlike `geo::Rect::new`, construction never
/// reorders inverted bounds, so callers can detect a malformed region before
/// doing any work with it.
///
/// # Examples
///
/// ```
/// use hexdiv_types::region::Region;
/// use hexdiv_types::coord::Coordinate;
///
/// let chicago = Region::new(41.6445, -87.9401, 42.0230, -87.5237);
/// assert!(chicago.contains(&Coordinate::new(41.8781, -87.6298)));
/// assert!(chicago.is_well_formed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl Region {
    /// Create a region from `(lat_min, lon_min, lat_max, lon_max)`.
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
        }
    }

    /// Create a region from a `[lat_min, lon_min, lat_max, lon_max]` array.
    pub fn from_bounds(bounds: [f64; 4]) -> Self {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// The bounds as `[lat_min, lon_min, lat_max, lon_max]`.
    pub fn bounds(&self) -> [f64; 4] {
        [self.lat_min, self.lon_min, self.lat_max, self.lon_max]
    }

    /// All bounds finite, in geographic range, and strictly ordered.
    pub fn is_well_formed(&self) -> bool {
        Coordinate::new(self.lat_min, self.lon_min).is_geographic()
            && Coordinate::new(self.lat_max, self.lon_max).is_geographic()
            && self.lat_min < self.lat_max
            && self.lon_min < self.lon_max
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// The latitude inside the region closest to the equator.
    ///
    /// Longitude degrees are longest there, so it bounds east-west cell
    /// extents from below.
    pub fn lat_nearest_equator(&self) -> f64 {
        if self.lat_min <= 0.0 && self.lat_max >= 0.0 {
            0.0
        } else if self.lat_min > 0.0 {
            self.lat_min
        } else {
            self.lat_max
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.lat() >= self.lat_min
            && coord.lat() <= self.lat_max
            && coord.lon() >= self.lon_min
            && coord.lon() <= self.lon_max
    }

    /// The region as a `geo::Rect` (x = longitude, y = latitude).
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.lon_min, y: self.lat_min },
            geo::coord! { x: self.lon_max, y: self.lat_max },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}
