//! OpenStreetMap features through the Overpass API.
//!
//! Query building and response parsing are always available; the HTTP
//! client itself needs the `overpass` feature.

use crate::error::{HexDivError, Result};
use hexdiv_types::feature::Feature;
use hexdiv_types::region::Region;
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[cfg(feature = "overpass")]
use crate::config::ProviderConfig;
#[cfg(feature = "overpass")]
use crate::provider::FeatureProvider;

/// Overpass QL selecting every node carrying `tag` inside `region`.
///
/// The bounding box is written south, west, north, east.
pub fn build_query(region: &Region, tag: &str) -> String {
    format!(
        "[out:json];\nnode[\"{tag}\"]({s},{w},{n},{e});\nout geom;",
        tag = tag,
        s = region.lat_min,
        w = region.lon_min,
        n = region.lat_max,
        e = region.lon_max,
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: FxHashMap<String, String>,
}

impl Element {
    /// Missing coordinates become NaN so the aggregator reports them.
    fn into_feature(mut self, tag: &str) -> Feature {
        Feature {
            lat: self.lat.unwrap_or(f64::NAN),
            lon: self.lon.unwrap_or(f64::NAN),
            category: self.tags.remove(tag),
        }
    }
}

/// Turn an Overpass JSON body into features, using the value of `tag` as
/// the category.
///
/// A body that is not an Overpass document is reported as
/// `ProviderUnavailable`.
pub fn parse_response(body: &str, tag: &str) -> Result<Vec<Feature>> {
    let response: OverpassResponse = serde_json::from_str(body).map_err(|e| {
        HexDivError::ProviderUnavailable(format!("Malformed Overpass response: {}", e))
    })?;

    Ok(response
        .elements
        .into_iter()
        .map(|element| element.into_feature(tag))
        .collect())
}

/// Blocking Overpass client.
#[cfg(feature = "overpass")]
#[derive(Debug, Clone)]
pub struct OverpassProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    category_tag: String,
}

#[cfg(feature = "overpass")]
impl OverpassProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                HexDivError::ProviderUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            category_tag: config.category_tag.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "overpass")]
impl FeatureProvider for OverpassProvider {
    fn fetch(&self, region: &Region) -> Result<Vec<Feature>> {
        let query = build_query(region, &self.category_tag);
        log::debug!("Querying {} for [{}] nodes", self.endpoint, self.category_tag);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .map_err(|e| HexDivError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HexDivError::ProviderUnavailable(format!(
                "Status {}",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("json") {
            return Err(HexDivError::ProviderUnavailable(format!(
                "Expected JSON, got content type '{}'",
                content_type
            )));
        }

        let body = response
            .text()
            .map_err(|e| HexDivError::ProviderUnavailable(e.to_string()))?;
        parse_response(&body, &self.category_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_south_west_north_east() {
        let region = Region::new(37.7045, -122.527, 37.8122, -122.3493);
        let query = build_query(&region, "amenity");
        assert_eq!(
            query,
            "[out:json];\nnode[\"amenity\"](37.7045,-122.527,37.8122,-122.3493);\nout geom;"
        );
    }

    #[test]
    fn test_parse_elements() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 37.77, "lon": -122.41, "tags": {"amenity": "cafe", "name": "Blue"}},
                {"type": "node", "id": 2, "lat": 37.78, "lon": -122.42, "tags": {"shop": "bakery"}},
                {"type": "node", "id": 3, "lat": 37.79, "lon": -122.43}
            ]
        }"#;

        let features = parse_response(body, "amenity").unwrap();
        assert_eq!(
            features,
            vec![
                Feature::new(37.77, -122.41, "cafe"),
                Feature::uncategorized(37.78, -122.42),
                Feature::uncategorized(37.79, -122.43),
            ]
        );
    }

    #[test]
    fn test_missing_coordinates_become_nan() {
        let body = r#"{"elements": [{"type": "way", "id": 9, "tags": {"amenity": "parking"}}]}"#;
        let features = parse_response(body, "amenity").unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].lat.is_nan());
        assert!(features[0].lon.is_nan());
        assert_eq!(features[0].label(), Some("parking"));
    }

    #[test]
    fn test_missing_elements_is_empty() {
        assert!(parse_response("{}", "amenity").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_unavailable() {
        let err = parse_response("<html>rate limited</html>", "amenity").unwrap_err();
        assert!(matches!(err, HexDivError::ProviderUnavailable(_)));
    }

    #[cfg(feature = "overpass")]
    #[test]
    fn test_provider_rejects_bad_config() {
        let config = ProviderConfig::default().with_timeout_secs(0);
        assert!(matches!(
            OverpassProvider::new(&config),
            Err(HexDivError::Config(_))
        ));
    }
}
