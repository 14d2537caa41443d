use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
///
/// Wraps `geo::Point` with latitude-first accessors. The inner point follows
/// the `geo` convention of `x = longitude`, `y = latitude`.
///
/// # Examples
///
/// ```
/// use hexdiv_types::coord::Coordinate;
///
/// let sf = Coordinate::new(37.7749, -122.4194);
/// assert_eq!(sf.lat(), 37.7749);
/// assert_eq!(sf.lon(), -122.4194);
/// assert_eq!(sf.inner().x(), -122.4194);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    inner: geo::Point<f64>,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            inner: geo::Point::new(lon, lat),
        }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.inner.y()
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.inner.x()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Convert into the inner `geo::Point`.
    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }

    /// Both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat().is_finite() && self.lon().is_finite()
    }

    /// Finite and within latitude [-90, 90] and longitude [-180, 180].
    pub fn is_geographic(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.lat())
            && (-180.0..=180.0).contains(&self.lon())
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(inner: geo::Point<f64>) -> Self {
        Self { inner }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(coord: Coordinate) -> Self {
        coord.inner.0
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat(), self.lon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lon_order() {
        let c = Coordinate::new(40.7128, -74.0060);
        assert_eq!(c.lat(), 40.7128);
        assert_eq!(c.lon(), -74.0060);
        assert_eq!(c.inner().y(), 40.7128);
    }

    #[test]
    fn test_geographic_range() {
        assert!(Coordinate::new(90.0, 180.0).is_geographic());
        assert!(Coordinate::new(-90.0, -180.0).is_geographic());
        assert!(!Coordinate::new(90.1, 0.0).is_geographic());
        assert!(!Coordinate::new(0.0, -180.5).is_geographic());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_geographic());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_geo_coord_conversion() {
        let coord = geo::coord! { x: 10.0, y: 20.0 };
        let c = Coordinate::from(coord);
        assert_eq!(c.lat(), 20.0);
        assert_eq!(c.lon(), 10.0);
        assert_eq!(geo::Coord::from(c), coord);
    }
}
