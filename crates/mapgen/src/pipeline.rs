//! Map plan assembly.
//!
//! Loads the boundary once, then turns every configured layer into a
//! ready-to-embed descriptor. The boundary draws the outline layer, anchors
//! the region markers, masks every raster overlay, and supplies the view
//! center when the configuration leaves it unset. A layer that fails to
//! load or render is logged and dropped; the rest of the map still builds.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

use geometry::{locate, Region, RegionGeometry};
use ingest::{load_heat_points, load_raster, regions_from_value, IngestError};
use map_common::{GeoBounds, LayerDescriptor, Marker, RenderError, DEFAULT_BOUNDS};
use renderer::palette;

use crate::config::{CategoryConfig, LayerConfig, MapConfig};
use crate::error::PipelineResult;

/// Category id assigned to the boundary layer.
pub const BOUNDARY_CATEGORY: &str = "boundary";

/// The assembled plan for one output document.
#[derive(Debug, Clone)]
pub struct MapPlan {
    pub title: String,
    /// Initial view center as (lat, lon).
    pub center: (f64, f64),
    pub zoom: u8,
    /// Layers in document order: the boundary first, then the configured
    /// hazard layers.
    pub layers: Vec<PlannedLayer>,
}

/// One layer of the plan, grouped under a sidebar category.
#[derive(Debug, Clone)]
pub struct PlannedLayer {
    pub category_id: String,
    pub category_title: String,
    pub layer: LayerDescriptor,
    /// Whether the layer starts visible. The boundary does; hazard layers
    /// wait for the reader to switch them on.
    pub visible: bool,
}

/// Assemble the plan for a configured map.
pub fn build_plan(config: &MapConfig) -> PipelineResult<MapPlan> {
    let source = config.boundary.display().to_string();
    let text = fs::read_to_string(&config.boundary).map_err(IngestError::from)?;
    let document: Value = serde_json::from_str(&text).map_err(IngestError::from)?;
    let regions = regions_from_value(&document, &source)?;
    info!(source = %source, regions = regions.len(), "Loaded boundary");

    let boundary = combined_geometry(&regions);
    let center = config.center.unwrap_or_else(|| {
        let anchor = locate(&boundary);
        debug!(lat = anchor.lat, lon = anchor.lon, "Anchored view center");
        (anchor.lat, anchor.lon)
    });

    let boundary_name = boundary_display_name(&config.boundary);
    let mut layers = vec![PlannedLayer {
        category_id: BOUNDARY_CATEGORY.to_string(),
        category_title: boundary_name.clone(),
        layer: LayerDescriptor::Boundary {
            name: boundary_name,
            geojson: document,
            style: config.border_style.clone(),
        },
        visible: true,
    }];

    let raster_bounds = config.default_raster_bounds.unwrap_or(DEFAULT_BOUNDS);
    let jobs: Vec<(&CategoryConfig, &LayerConfig)> = config
        .categories
        .iter()
        .flat_map(|c| c.layers.iter().map(move |l| (c, l)))
        .collect();

    // Raster layers dominate the build time, so every hazard layer job
    // fans out. Collection preserves the configured order.
    layers.extend(
        jobs.into_par_iter()
            .filter_map(|(category, layer)| {
                build_layer(layer, &regions, &boundary, raster_bounds).map(|descriptor| {
                    PlannedLayer {
                        category_id: category.id.clone(),
                        category_title: category.title.clone(),
                        layer: descriptor,
                        visible: false,
                    }
                })
            })
            .collect::<Vec<_>>(),
    );

    info!(title = %config.title, layers = layers.len(), "Assembled map plan");

    Ok(MapPlan {
        title: config.title.clone(),
        center,
        zoom: config.zoom,
        layers,
    })
}

fn build_layer(
    layer: &LayerConfig,
    regions: &[Region],
    boundary: &RegionGeometry,
    raster_bounds: GeoBounds,
) -> Option<LayerDescriptor> {
    match layer {
        LayerConfig::Markers { name } => Some(marker_layer(name, regions)),

        LayerConfig::Heatmap {
            name,
            source,
            weight_property,
            default_weight,
            radius,
            blur,
        } => match load_heat_points(source, weight_property, *default_weight) {
            Ok(points) => {
                debug!(layer = %name, points = points.len(), "Loaded heat points");
                Some(LayerDescriptor::Heatmap {
                    name: name.clone(),
                    points,
                    radius: *radius,
                    blur: *blur,
                })
            }
            Err(e) => {
                warn!(error = %e, layer = %name, "Skipping heat layer");
                None
            }
        },

        LayerConfig::Raster {
            name,
            source,
            palette: palette_id,
            opacity,
        } => {
            let grid = match load_raster(source, raster_bounds) {
                Ok(grid) => grid,
                Err(e) => {
                    warn!(error = %e, layer = %name, "Skipping raster layer");
                    return None;
                }
            };

            match renderer::render(&grid, boundary, palette_id, *opacity) {
                Ok(image) => {
                    debug!(
                        layer = %name,
                        width = image.width,
                        height = image.height,
                        "Rendered raster overlay"
                    );
                    Some(LayerDescriptor::Overlay {
                        name: name.clone(),
                        image,
                    })
                }
                Err(e @ RenderError::UnknownPalette(_)) => {
                    warn!(
                        error = %e,
                        available = ?palette::names(),
                        layer = %name,
                        "Skipping raster layer"
                    );
                    None
                }
                Err(e) => {
                    warn!(error = %e, layer = %name, "Skipping raster layer");
                    None
                }
            }
        }
    }
}

/// One labelled marker per region, placed by the anchor locator.
fn marker_layer(name: &str, regions: &[Region]) -> LayerDescriptor {
    let markers = regions
        .iter()
        .map(|region| {
            let anchor = locate(&region.geometry);
            Marker {
                lat: anchor.lat,
                lon: anchor.lon,
                label: region.name.clone(),
            }
        })
        .collect();

    LayerDescriptor::Markers {
        name: name.to_string(),
        markers,
    }
}

/// Flatten every region's polygons into one geometry for masking and
/// anchoring. A point counts as inside when any member contains it.
fn combined_geometry(regions: &[Region]) -> RegionGeometry {
    let polygons = regions
        .iter()
        .flat_map(|r| r.geometry.polygons().iter().cloned())
        .collect();
    RegionGeometry::MultiPolygon(polygons)
}

/// Display name for the boundary layer, taken from the file stem.
fn boundary_display_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Boundary".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::{Polygon, Ring};

    fn square(name: &str, origin: f64, size: f64) -> Region {
        Region::new(
            name,
            RegionGeometry::Polygon(Polygon::new(Ring::new(vec![
                (origin, origin),
                (origin + size, origin),
                (origin + size, origin + size),
                (origin, origin + size),
            ]))),
        )
    }

    #[test]
    fn test_combined_geometry_flattens_regions() {
        let regions = vec![square("A", 0.0, 1.0), square("B", 10.0, 2.0)];
        let combined = combined_geometry(&regions);

        assert_eq!(combined.polygons().len(), 2);
        assert!(combined.contains(0.5, 0.5));
        assert!(combined.contains(11.0, 11.0));
        assert!(!combined.contains(5.0, 5.0));
    }

    #[test]
    fn test_marker_layer_labels_every_region() {
        let regions = vec![square("Afar", 0.0, 2.0), square("Oromia", 10.0, 4.0)];
        let layer = marker_layer("Region labels", &regions);

        match layer {
            LayerDescriptor::Markers { name, markers } => {
                assert_eq!(name, "Region labels");
                assert_eq!(markers.len(), 2);
                assert_eq!(markers[0].label, "Afar");
                assert_eq!((markers[0].lat, markers[0].lon), (1.0, 1.0));
                assert_eq!(markers[1].label, "Oromia");
                assert_eq!((markers[1].lat, markers[1].lon), (12.0, 12.0));
            }
            other => panic!("expected markers, got {other:?}"),
        }
    }

    #[test]
    fn test_boundary_display_name_from_stem() {
        assert_eq!(
            boundary_display_name(Path::new("data/ethiopia.geojson")),
            "Ethiopia"
        );
        assert_eq!(boundary_display_name(Path::new("kenya.json")), "Kenya");
        assert_eq!(boundary_display_name(Path::new("")), "Boundary");
    }
}
