//! Preset regions for well-known cities.

use hexdiv_types::region::Region;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// City names and their `[lat_min, lon_min, lat_max, lon_max]` bounds.
const CITIES: [(&str, [f64; 4]); 10] = [
    ("San Francisco", [37.7045, -122.527, 37.8122, -122.3493]),
    ("New York", [40.4774, -74.2591, 40.9176, -73.7004]),
    ("Los Angeles", [33.7036, -118.6682, 34.3373, -118.1553]),
    ("Chicago", [41.6445, -87.9401, 42.0230, -87.5237]),
    ("Houston", [29.5223, -95.7975, 30.1547, -95.0148]),
    ("Phoenix", [33.2903, -112.3241, 33.7490, -111.9286]),
    ("Philadelphia", [39.8670, -75.2803, 40.1377, -74.9558]),
    ("San Antonio", [29.2072, -98.7364, 29.6632, -98.2955]),
    ("San Diego", [32.5343, -117.2898, 33.1140, -116.9583]),
    ("Dallas", [32.6200, -96.9982, 32.9957, -96.4635]),
];

static BY_NAME: Lazy<FxHashMap<String, Region>> = Lazy::new(|| {
    CITIES
        .iter()
        .map(|(name, bounds)| (name.to_lowercase(), Region::from_bounds(*bounds)))
        .collect()
});

/// Look up a city by name, ignoring case and surrounding whitespace.
///
/// # Examples
///
/// ```
/// use hexdiv::regions;
///
/// let sf = regions::named("san francisco").unwrap();
/// assert!(sf.is_well_formed());
/// assert!(regions::named("Atlantis").is_none());
/// ```
pub fn named(name: &str) -> Option<Region> {
    BY_NAME.get(&name.trim().to_lowercase()).copied()
}

/// Every preset as `(name, region)`, in a fixed order.
pub fn all() -> impl Iterator<Item = (&'static str, Region)> {
    CITIES
        .iter()
        .map(|(name, bounds)| (*name, Region::from_bounds(*bounds)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_well_formed() {
        assert_eq!(all().count(), 10);
        for (name, region) in all() {
            assert!(region.is_well_formed(), "{}", name);
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let expected = Region::new(41.6445, -87.9401, 42.0230, -87.5237);
        assert_eq!(named("Chicago"), Some(expected));
        assert_eq!(named("CHICAGO"), Some(expected));
        assert_eq!(named("  chicago "), Some(expected));
    }

    #[test]
    fn test_unknown_city() {
        assert_eq!(named("Gotham"), None);
        assert_eq!(named(""), None);
    }

    #[test]
    fn test_every_preset_resolvable() {
        for (name, region) in all() {
            assert_eq!(named(name), Some(region));
        }
    }
}
