//! GeoJSON export of aggregation results.

use crate::error::{HexDivError, Result};
use crate::pipeline::{CellRecord, ResultSet};
use geo::Polygon;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Converts a polygon to a GeoJSON geometry, exterior ring first.
pub fn polygon_to_geometry(polygon: &Polygon<f64>) -> Geometry {
    let ring = |line: &geo::LineString<f64>| -> Vec<Vec<f64>> {
        line.coords().map(|coord| vec![coord.x, coord.y]).collect()
    };

    let mut rings = vec![ring(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring));
    Geometry::new(Value::Polygon(rings))
}

/// One polygon feature for a cell, or `None` when it has no boundary.
///
/// Properties: `cell`, `diversity`, `highlighted` and `counts` (category to
/// count).
pub fn record_to_feature(record: &CellRecord) -> Option<Feature> {
    let boundary = record.boundary.as_ref()?;

    let counts: JsonObject = record
        .counts
        .iter()
        .map(|(category, count)| (category.to_string(), json!(count)))
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("cell".to_string(), json!(record.cell.to_string()));
    properties.insert("diversity".to_string(), json!(record.diversity));
    properties.insert("highlighted".to_string(), json!(record.highlighted));
    properties.insert("counts".to_string(), counts.into());

    Some(Feature {
        bbox: None,
        geometry: Some(polygon_to_geometry(boundary)),
        id: Some(Id::String(record.cell.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Every renderable cell of `result` as a feature collection, in cell order.
pub fn result_set_to_feature_collection(result: &ResultSet) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: result.records.iter().filter_map(record_to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes `result` as a GeoJSON FeatureCollection string.
pub fn result_set_to_geojson(result: &ResultSet) -> Result<String> {
    let collection = result_set_to_feature_collection(result);
    serde_json::to_string(&collection).map_err(|e| {
        HexDivError::Serialization(format!("Failed to serialize result set: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::aggregate::{AggregationReport, FrequencyTable};
    use geo::polygon;
    use hexdiv_types::cell::{CellId, Resolution};
    use hexdiv_types::region::Region;

    fn square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]
    }

    fn record(id: u64, boundary: Option<Polygon<f64>>, categories: &[&str]) -> CellRecord {
        let counts: FrequencyTable = categories.iter().collect();
        CellRecord {
            cell: CellId::new(id),
            boundary,
            diversity: counts.diversity(),
            highlighted: counts.diversity() >= 2,
            counts,
        }
    }

    fn result_set(records: Vec<CellRecord>) -> ResultSet {
        ResultSet {
            region: Region::new(0.0, 0.0, 1.0, 1.0),
            resolution: Resolution::new(7),
            threshold: 2,
            records,
            report: AggregationReport::default(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_polygon_geometry_is_closed_lon_lat() {
        let geometry = polygon_to_geometry(&square());
        match geometry.value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].first(), rings[0].last());
                assert_eq!(rings[0][1], vec![1.0, 0.0]);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_feature_properties() {
        let feature = record_to_feature(&record(0xabc, Some(square()), &["cafe", "cafe", "bank"]))
            .unwrap();
        let properties = feature.properties.unwrap();

        assert_eq!(feature.id, Some(Id::String("abc".to_string())));
        assert_eq!(properties["cell"], "abc");
        assert_eq!(properties["diversity"], 2);
        assert_eq!(properties["highlighted"], true);
        assert_eq!(properties["counts"]["cafe"], 2);
        assert_eq!(properties["counts"]["bank"], 1);
    }

    #[test]
    fn test_cells_without_boundary_are_omitted() {
        let result = result_set(vec![
            record(1, Some(square()), &[]),
            record(2, None, &["cafe"]),
        ]);
        let collection = result_set_to_feature_collection(&result);
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_result_set_to_geojson_parses_back() {
        let result = result_set(vec![record(1, Some(square()), &["school"])]);
        let json = result_set_to_geojson(&result).unwrap();

        match json.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::FeatureCollection(parsed) => assert_eq!(parsed.features.len(), 1),
            other => panic!("expected a feature collection, got {:?}", other),
        }
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["counts"]["school"], 1);
    }
}
