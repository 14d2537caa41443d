//! Validation for geographic coordinates, regions and thresholds.

use crate::config::{MAX_THRESHOLD, MIN_THRESHOLD};
use crate::error::{HexDivError, Result};
use hexdiv_types::coord::Coordinate;
use hexdiv_types::region::Region;

/// Validates a coordinate has a finite latitude and longitude in range.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use hexdiv::compute::validation::validate_coordinate;
/// use hexdiv::Coordinate;
///
/// assert!(validate_coordinate(&Coordinate::new(40.7128, -74.0060)).is_ok());
/// assert!(validate_coordinate(&Coordinate::new(95.0, -74.0)).is_err());
/// assert!(validate_coordinate(&Coordinate::new(40.0, 200.0)).is_err());
/// ```
pub fn validate_coordinate(coord: &Coordinate) -> Result<()> {
    let (lat, lon) = (coord.lat(), coord.lon());

    if !lat.is_finite() {
        return Err(HexDivError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !lon.is_finite() {
        return Err(HexDivError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(HexDivError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(HexDivError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    Ok(())
}

/// Validates a region: every bound in range and min < max on both axes.
///
/// # Examples
///
/// ```
/// use hexdiv::compute::validation::validate_region;
/// use hexdiv::Region;
///
/// assert!(validate_region(&Region::new(-10.0, -10.0, 10.0, 10.0)).is_ok());
/// assert!(validate_region(&Region::new(10.0, -10.0, -10.0, 10.0)).is_err()); // lat_min > lat_max
/// ```
pub fn validate_region(region: &Region) -> Result<()> {
    let corners = [
        ("min", Coordinate::new(region.lat_min, region.lon_min)),
        ("max", Coordinate::new(region.lat_max, region.lon_max)),
    ];
    for (name, corner) in corners {
        validate_coordinate(&corner)
            .map_err(|e| HexDivError::InvalidRegion(format!("{} corner: {}", name, e)))?;
    }

    if region.lat_min >= region.lat_max {
        return Err(HexDivError::InvalidRegion(format!(
            "lat_min ({}) must be < lat_max ({})",
            region.lat_min, region.lat_max
        )));
    }
    if region.lon_min >= region.lon_max {
        return Err(HexDivError::InvalidRegion(format!(
            "lon_min ({}) must be < lon_max ({})",
            region.lon_min, region.lon_max
        )));
    }

    Ok(())
}

/// Validates a highlight threshold lies in `[MIN_THRESHOLD, MAX_THRESHOLD]`.
///
/// # Examples
///
/// ```
/// use hexdiv::compute::validation::validate_threshold;
///
/// assert!(validate_threshold(3).is_ok());
/// assert!(validate_threshold(0).is_err());
/// assert!(validate_threshold(51).is_err());
/// ```
pub fn validate_threshold(threshold: u32) -> Result<()> {
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold) {
        return Err(HexDivError::InvalidThreshold(format!(
            "Threshold out of range [{}, {}]: {}",
            MIN_THRESHOLD, MAX_THRESHOLD, threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let nyc = Coordinate::new(40.7128, -74.0060);
        assert!(validate_coordinate(&nyc).is_ok());

        let tokyo = Coordinate::new(35.6895, 139.6917);
        assert!(validate_coordinate(&tokyo).is_ok());

        // Edge cases
        assert!(validate_coordinate(&Coordinate::new(90.0, 0.0)).is_ok());
        assert!(validate_coordinate(&Coordinate::new(-90.0, 0.0)).is_ok());
        assert!(validate_coordinate(&Coordinate::new(0.0, 180.0)).is_ok());
        assert!(validate_coordinate(&Coordinate::new(0.0, -180.0)).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(validate_coordinate(&Coordinate::new(95.0, -74.0)).is_err());
        assert!(validate_coordinate(&Coordinate::new(-90.1, -74.0)).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(validate_coordinate(&Coordinate::new(40.0, 200.0)).is_err());
        assert!(validate_coordinate(&Coordinate::new(40.0, -180.1)).is_err());
    }

    #[test]
    fn test_non_finite_coordinates() {
        for coord in [
            Coordinate::new(f64::NAN, 0.0),
            Coordinate::new(0.0, f64::NAN),
            Coordinate::new(f64::INFINITY, 0.0),
            Coordinate::new(0.0, f64::NEG_INFINITY),
        ] {
            assert!(matches!(
                validate_coordinate(&coord),
                Err(HexDivError::InvalidCoordinate(_))
            ));
        }
    }

    #[test]
    fn test_validate_region() {
        assert!(validate_region(&Region::new(-10.0, -10.0, 10.0, 10.0)).is_ok());
        assert!(validate_region(&Region::new(-90.0, -180.0, 90.0, 180.0)).is_ok());

        // min >= max
        assert!(validate_region(&Region::new(10.0, -10.0, -10.0, 10.0)).is_err());
        assert!(validate_region(&Region::new(-10.0, 10.0, 10.0, -10.0)).is_err());
        assert!(validate_region(&Region::new(5.0, 5.0, 5.0, 6.0)).is_err());

        // Out of range
        let err = validate_region(&Region::new(-100.0, -10.0, 10.0, 10.0)).unwrap_err();
        assert!(matches!(err, HexDivError::InvalidRegion(_)));
        assert!(validate_region(&Region::new(-10.0, -10.0, 10.0, 190.0)).is_err());
    }

    #[test]
    fn test_near_zero_region_is_valid() {
        assert!(validate_region(&Region::new(10.0, 10.0, 10.0000001, 10.0000001)).is_ok());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(MIN_THRESHOLD).is_ok());
        assert!(validate_threshold(MAX_THRESHOLD).is_ok());
        assert!(validate_threshold(0).is_err());
        assert!(validate_threshold(MAX_THRESHOLD + 1).is_err());
    }
}
