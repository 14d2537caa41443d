use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A point observation with an optional category label.
///
/// Coordinates are kept as raw numbers: providers may hand over malformed
/// values, and it is up to the consumer to skip them.
///
/// # Examples
///
/// ```
/// use hexdiv_types::feature::Feature;
///
/// let bank = Feature::new(40.7128, -74.0060, "bank");
/// assert_eq!(bank.label(), Some("bank"));
///
/// let unknown = Feature::uncategorized(40.7128, -74.0060);
/// assert_eq!(unknown.label(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl Feature {
    pub fn new(lat: f64, lon: f64, category: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            category: Some(category.into()),
        }
    }

    /// A feature with no category label.
    pub fn uncategorized(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            category: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// The category label, treating an empty string as absent.
    pub fn label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_is_absent() {
        let f = Feature::new(0.0, 0.0, "");
        assert_eq!(f.label(), None);
    }

    #[test]
    fn test_deserialize_without_category() {
        let f: Feature = serde_json::from_str(r#"{"lat": 1.5, "lon": 2.5}"#).unwrap();
        assert_eq!(f, Feature::uncategorized(1.5, 2.5));
    }

    #[test]
    fn test_coordinate() {
        let f = Feature::new(1.0, 2.0, "cafe");
        assert_eq!(f.coordinate().lat(), 1.0);
        assert_eq!(f.coordinate().lon(), 2.0);
    }
}
