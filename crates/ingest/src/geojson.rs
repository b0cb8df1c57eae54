//! Loose GeoJSON reading for boundary and point files.
//!
//! Boundary files come from many producers, so the model stays permissive:
//! the geometry type is a plain string and coordinates stay raw JSON until
//! a loader knows what shape to expect. A malformed feature skips instead
//! of failing the whole file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use geometry::{Polygon, Region, RegionGeometry, Ring};
use map_common::HeatPoint;

use crate::error::{IngestError, IngestResult};

/// A GeoJSON FeatureCollection, features only.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A GeoJSON Feature with arbitrary properties.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Geometry with coordinates left raw until the caller knows the type.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Type identifier ("Polygon", "MultiPolygon", "Point", ...).
    #[serde(rename = "type", default)]
    pub type_: String,

    #[serde(default)]
    pub coordinates: Value,
}

/// Load named regions from a GeoJSON boundary file.
///
/// Features with Polygon or MultiPolygon geometry become regions; holes and
/// other geometry types are ignored. Names come from the `name`, `Name` or
/// `NAME` property, falling back to a positional label. A file yielding no
/// regions at all is an error.
pub fn load_regions(path: &Path) -> IngestResult<Vec<Region>> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    regions_from_value(&document, &path.display().to_string())
}

/// Extract regions from an already-parsed GeoJSON document.
pub fn regions_from_value(document: &Value, source: &str) -> IngestResult<Vec<Region>> {
    let collection = FeatureCollection::deserialize(document)?;

    let mut regions = Vec::new();
    let mut warned_open_rings = false;

    for feature in &collection.features {
        let geometry = match &feature.geometry {
            Some(g) => g,
            None => continue,
        };

        let parsed = match geometry.type_.as_str() {
            "Polygon" => polygon_from_coordinates(&geometry.coordinates)
                .map(|(polygon, open)| (RegionGeometry::Polygon(polygon), open)),
            "MultiPolygon" => multipolygon_from_coordinates(&geometry.coordinates)
                .map(|(members, open)| (RegionGeometry::MultiPolygon(members), open)),
            other => {
                debug!(geometry_type = other, "Skipping non-boundary feature");
                continue;
            }
        };

        let (region_geometry, open) = match parsed {
            Some(result) => result,
            None => {
                debug!(
                    geometry_type = %geometry.type_,
                    "Skipping feature with malformed coordinates"
                );
                continue;
            }
        };

        if open && !warned_open_rings {
            warn!(source, "Boundary rings are not closed; closing them");
            warned_open_rings = true;
        }

        let name = region_name(feature, regions.len() + 1);
        regions.push(Region::new(name, region_geometry));
    }

    if regions.is_empty() {
        return Err(IngestError::NoRegions(source.to_string()));
    }

    Ok(regions)
}

/// Load weighted points for a heat layer.
///
/// Any feature whose coordinates are a `[lon, lat]` pair contributes a
/// point; the geometry type is not consulted, which also accepts the
/// lowercase "point" some converters emit. The weight comes from the named
/// numeric property, falling back to `default_weight`. Malformed features
/// skip silently.
pub fn load_heat_points(
    path: &Path,
    weight_property: &str,
    default_weight: f64,
) -> IngestResult<Vec<HeatPoint>> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    let collection = FeatureCollection::deserialize(&document)?;

    let mut points = Vec::new();
    for feature in &collection.features {
        let geometry = match &feature.geometry {
            Some(g) => g,
            None => continue,
        };
        let [lon, lat] = match <[f64; 2]>::deserialize(&geometry.coordinates) {
            Ok(pair) => pair,
            Err(_) => continue,
        };

        let weight = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(weight_property))
            .and_then(Value::as_f64)
            .unwrap_or(default_weight);

        points.push(HeatPoint { lat, lon, weight });
    }

    Ok(points)
}

/// Parse Polygon coordinates, keeping only the exterior ring.
///
/// The boolean reports whether the ring arrived unclosed.
fn polygon_from_coordinates(coordinates: &Value) -> Option<(Polygon, bool)> {
    let rings = <Vec<Vec<[f64; 2]>>>::deserialize(coordinates).ok()?;
    let points = exterior_points(rings)?;
    let open = is_open(&points);
    Some((Polygon::new(Ring::new(points)), open))
}

/// Parse MultiPolygon coordinates, one exterior ring per member.
fn multipolygon_from_coordinates(coordinates: &Value) -> Option<(Vec<Polygon>, bool)> {
    let members = <Vec<Vec<Vec<[f64; 2]>>>>::deserialize(coordinates).ok()?;

    let mut open = false;
    let mut polygons = Vec::new();
    for rings in members {
        if let Some(points) = exterior_points(rings) {
            open = open || is_open(&points);
            polygons.push(Polygon::new(Ring::new(points)));
        }
    }

    if polygons.is_empty() {
        None
    } else {
        Some((polygons, open))
    }
}

/// First (exterior) ring of a parsed coordinate array, as (lon, lat) pairs.
fn exterior_points(rings: Vec<Vec<[f64; 2]>>) -> Option<Vec<(f64, f64)>> {
    let exterior = rings.into_iter().next()?;
    if exterior.is_empty() {
        return None;
    }
    Some(exterior.into_iter().map(|[lon, lat]| (lon, lat)).collect())
}

fn is_open(points: &[(f64, f64)]) -> bool {
    points.len() > 1 && points.first() != points.last()
}

fn region_name(feature: &Feature, position: usize) -> String {
    feature
        .properties
        .as_ref()
        .and_then(|props| {
            ["name", "Name", "NAME"]
                .iter()
                .find_map(|key| props.get(*key))
        })
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Region {}", position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_regions_from_polygon_feature() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "Oromia" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[34.0, 4.0], [42.0, 4.0], [42.0, 10.0], [34.0, 10.0], [34.0, 4.0]]]
                }
            }]
        });

        let regions = regions_from_value(&doc, "test").unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Oromia");
    }

    #[test]
    fn test_region_name_fallbacks() {
        let doc = json!({
            "features": [
                {
                    "properties": { "NAME": "Afar" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]] }
                },
                {
                    "properties": { "population": 4100000 },
                    "geometry": { "type": "Polygon", "coordinates": [[[2.0, 0.0], [3.0, 0.0], [3.0, 1.0]]] }
                }
            ]
        });

        let regions = regions_from_value(&doc, "test").unwrap();
        assert_eq!(regions[0].name, "Afar");
        assert_eq!(regions[1].name, "Region 2");
    }

    #[test]
    fn test_multipolygon_keeps_all_members() {
        let doc = json!({
            "features": [{
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                        [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]]
                    ]
                }
            }]
        });

        let regions = regions_from_value(&doc, "test").unwrap();
        match &regions[0].geometry {
            RegionGeometry::MultiPolygon(members) => assert_eq!(members.len(), 2),
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_point_features_are_not_regions() {
        let doc = json!({
            "features": [{
                "geometry": { "type": "Point", "coordinates": [38.7, 9.0] }
            }]
        });

        let err = regions_from_value(&doc, "points.geojson").unwrap_err();
        assert!(matches!(err, IngestError::NoRegions(_)));
    }

    #[test]
    fn test_malformed_feature_skips_but_good_one_loads() {
        let doc = json!({
            "features": [
                {
                    "geometry": { "type": "Polygon", "coordinates": "oops" }
                },
                {
                    "properties": { "name": "Sidama" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[36.0, 5.0], [39.0, 5.0], [39.0, 8.0], [36.0, 8.0], [36.0, 5.0]]]
                    }
                }
            ]
        });

        let regions = regions_from_value(&doc, "test").unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Sidama");
    }

    #[test]
    fn test_open_rings_are_closed() {
        let doc = json!({
            "features": [{
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]]
                }
            }]
        });

        let regions = regions_from_value(&doc, "test").unwrap();
        match &regions[0].geometry {
            RegionGeometry::Polygon(polygon) => {
                let points = polygon.exterior.points();
                assert_eq!(points.first(), points.last());
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }
}
