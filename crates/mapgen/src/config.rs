//! Pipeline configuration loader.
//!
//! Loads the map description from a YAML file: which boundary to draw, how
//! the initial view sits, and which hazard categories the sidebar offers.
//! One configuration file drives one output document, so adding a hazard
//! means adding a category here rather than writing another tool.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use map_common::{BorderStyle, GeoBounds};
use renderer::DEFAULT_OPACITY;

use crate::error::{PipelineError, PipelineResult};

/// Default document and sidebar title.
pub const DEFAULT_TITLE: &str = "Hazard Watch";

/// Default initial zoom level.
pub const DEFAULT_ZOOM: u8 = 6;

/// Default palette for raster layers.
pub const DEFAULT_PALETTE: &str = "YlOrRd";

/// Default heat kernel radius in pixels.
pub const DEFAULT_HEAT_RADIUS: u32 = 15;

/// Default heat kernel blur in pixels.
pub const DEFAULT_HEAT_BLUR: u32 = 10;

/// Default weight for heat points missing their weight property.
pub const DEFAULT_HEAT_WEIGHT: f64 = 50.0;

/// The full description of one map build.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Document and sidebar title.
    pub title: String,
    /// Initial view center as (lat, lon). When unset the pipeline anchors
    /// the view on the boundary's largest region.
    pub center: Option<(f64, f64)>,
    /// Initial zoom level.
    pub zoom: u8,
    /// Path to the boundary GeoJSON file.
    pub boundary: PathBuf,
    /// Stroke and fill styling for the boundary outline.
    pub border_style: BorderStyle,
    /// Placement for raster documents that declare no bounds of their own.
    pub default_raster_bounds: Option<GeoBounds>,
    /// Hazard categories in sidebar order.
    pub categories: Vec<CategoryConfig>,
}

/// One sidebar category and the layers it groups.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Stable identifier carried into the document.
    pub id: String,
    /// Sidebar button title.
    pub title: String,
    /// Layers in document order.
    pub layers: Vec<LayerConfig>,
}

/// One configured layer, tagged by kind.
#[derive(Debug, Clone)]
pub enum LayerConfig {
    /// A label marker on every boundary region.
    Markers { name: String },

    /// A client-rendered heat layer fed from a GeoJSON point file.
    Heatmap {
        name: String,
        source: PathBuf,
        /// Property holding each point's weight.
        weight_property: String,
        /// Weight for points missing that property.
        default_weight: f64,
        /// Kernel radius in pixels.
        radius: u32,
        /// Kernel blur in pixels.
        blur: u32,
    },

    /// A boundary-masked raster overlay from a raster JSON document.
    Raster {
        name: String,
        source: PathBuf,
        palette: String,
        opacity: f32,
    },
}

impl LayerConfig {
    /// Display name of the configured layer.
    pub fn name(&self) -> &str {
        match self {
            LayerConfig::Markers { name }
            | LayerConfig::Heatmap { name, .. }
            | LayerConfig::Raster { name, .. } => name,
        }
    }
}

impl MapConfig {
    /// Load a map configuration from a YAML file.
    ///
    /// Missing optional fields take defaults. Layers with an unknown kind
    /// or without a required source are skipped with a warning, so one bad
    /// entry costs one layer rather than the build.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let contents = fs::read_to_string(path).map_err(PipelineError::ConfigRead)?;
        let yaml: YamlMapFile = serde_yaml::from_str(&contents)?;
        Ok(Self::from_yaml(yaml))
    }

    fn from_yaml(yaml: YamlMapFile) -> Self {
        let categories = yaml
            .categories
            .into_iter()
            .map(|c| {
                let title = c.title.unwrap_or_else(|| c.id.clone());
                let layers = c
                    .layers
                    .into_iter()
                    .filter_map(|l| convert_layer(l, &title))
                    .collect();
                CategoryConfig {
                    id: c.id,
                    title,
                    layers,
                }
            })
            .collect();

        Self {
            title: yaml.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            center: yaml.center.map(|c| (c[0], c[1])),
            zoom: yaml.zoom.unwrap_or(DEFAULT_ZOOM),
            boundary: yaml.boundary,
            border_style: convert_border_style(yaml.border_style.unwrap_or_default()),
            default_raster_bounds: yaml.default_raster_bounds.map(GeoBounds::from_corners),
            categories,
        }
    }
}

fn convert_border_style(yaml: YamlBorderStyle) -> BorderStyle {
    let defaults = BorderStyle::default();
    BorderStyle {
        color: yaml.color.unwrap_or(defaults.color),
        weight: yaml.weight.unwrap_or(defaults.weight),
        fill_color: yaml.fill_color.unwrap_or(defaults.fill_color),
        fill_opacity: yaml.fill_opacity.unwrap_or(defaults.fill_opacity),
    }
}

fn convert_layer(yaml: YamlLayer, category_title: &str) -> Option<LayerConfig> {
    let name = yaml.name.unwrap_or_else(|| category_title.to_string());

    match yaml.kind.as_str() {
        "markers" => Some(LayerConfig::Markers { name }),
        "heatmap" => {
            let source = match yaml.source {
                Some(s) => s,
                None => {
                    warn!(layer = %name, "Heatmap layer has no source, skipping");
                    return None;
                }
            };
            Some(LayerConfig::Heatmap {
                name,
                source,
                weight_property: yaml
                    .weight_property
                    .unwrap_or_else(|| "weight".to_string()),
                default_weight: yaml.default_weight.unwrap_or(DEFAULT_HEAT_WEIGHT),
                radius: yaml.radius.unwrap_or(DEFAULT_HEAT_RADIUS),
                blur: yaml.blur.unwrap_or(DEFAULT_HEAT_BLUR),
            })
        }
        "raster" => {
            let source = match yaml.source {
                Some(s) => s,
                None => {
                    warn!(layer = %name, "Raster layer has no source, skipping");
                    return None;
                }
            };
            Some(LayerConfig::Raster {
                name,
                source,
                palette: yaml
                    .palette
                    .unwrap_or_else(|| DEFAULT_PALETTE.to_string()),
                opacity: yaml.opacity.unwrap_or(DEFAULT_OPACITY),
            })
        }
        other => {
            warn!(kind = %other, layer = %name, "Unknown layer kind, skipping");
            None
        }
    }
}

// ============================================================================
// YAML Parsing Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct YamlMapFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    center: Option<[f64; 2]>,
    #[serde(default)]
    zoom: Option<u8>,
    boundary: PathBuf,
    #[serde(default)]
    border_style: Option<YamlBorderStyle>,
    #[serde(default)]
    default_raster_bounds: Option<[[f64; 2]; 2]>,
    #[serde(default)]
    categories: Vec<YamlCategory>,
}

#[derive(Debug, Deserialize, Default)]
struct YamlBorderStyle {
    color: Option<String>,
    weight: Option<f32>,
    fill_color: Option<String>,
    fill_opacity: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct YamlCategory {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    layers: Vec<YamlLayer>,
}

#[derive(Debug, Deserialize)]
struct YamlLayer {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    weight_property: Option<String>,
    #[serde(default)]
    default_weight: Option<f64>,
    #[serde(default)]
    radius: Option<u32>,
    #[serde(default)]
    blur: Option<u32>,
    #[serde(default)]
    palette: Option<String>,
    #[serde(default)]
    opacity: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> MapConfig {
        MapConfig::from_yaml(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_minimal_config_takes_defaults() {
        let config = parse("boundary: regions.geojson\n");

        assert_eq!(config.title, "Hazard Watch");
        assert_eq!(config.center, None);
        assert_eq!(config.zoom, 6);
        assert_eq!(config.boundary, PathBuf::from("regions.geojson"));
        assert_eq!(config.border_style, BorderStyle::default());
        assert_eq!(config.default_raster_bounds, None);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_layer_defaults() {
        let config = parse(concat!(
            "boundary: regions.geojson\n",
            "categories:\n",
            "- id: rainfall\n",
            "  title: Rainfall\n",
            "  layers:\n",
            "  - kind: heatmap\n",
            "    source: rain.geojson\n",
            "  - kind: raster\n",
            "    source: rain_grid.json\n",
        ));

        let layers = &config.categories[0].layers;
        assert_eq!(layers.len(), 2);

        match &layers[0] {
            LayerConfig::Heatmap {
                name,
                weight_property,
                default_weight,
                radius,
                blur,
                ..
            } => {
                assert_eq!(name, "Rainfall");
                assert_eq!(weight_property, "weight");
                assert_eq!(*default_weight, 50.0);
                assert_eq!(*radius, 15);
                assert_eq!(*blur, 10);
            }
            other => panic!("expected heatmap, got {other:?}"),
        }

        match &layers[1] {
            LayerConfig::Raster {
                palette, opacity, ..
            } => {
                assert_eq!(palette, "YlOrRd");
                assert_eq!(*opacity, DEFAULT_OPACITY);
            }
            other => panic!("expected raster, got {other:?}"),
        }
    }

    #[test]
    fn test_full_config_round_trip() {
        let config = parse(concat!(
            "title: Flood Outlook\n",
            "center: [9.5, 40.0]\n",
            "zoom: 7\n",
            "boundary: et.geojson\n",
            "border_style:\n",
            "  color: black\n",
            "  fill_opacity: 0.1\n",
            "default_raster_bounds: [[3.4, 33.0], [14.9, 48.0]]\n",
            "categories:\n",
            "- id: flood\n",
            "  title: Flooding\n",
            "  layers:\n",
            "  - kind: raster\n",
            "    name: Flood risk\n",
            "    source: flood.json\n",
            "    palette: Blues\n",
            "    opacity: 0.5\n",
        ));

        assert_eq!(config.title, "Flood Outlook");
        assert_eq!(config.center, Some((9.5, 40.0)));
        assert_eq!(config.zoom, 7);
        assert_eq!(config.border_style.color, "black");
        assert_eq!(config.border_style.fill_opacity, 0.1);
        // Unset style fields still default.
        assert_eq!(config.border_style.fill_color, "purple");
        assert_eq!(
            config.default_raster_bounds,
            Some(GeoBounds::new(3.4, 33.0, 14.9, 48.0))
        );

        match &config.categories[0].layers[0] {
            LayerConfig::Raster {
                name,
                source,
                palette,
                opacity,
            } => {
                assert_eq!(name, "Flood risk");
                assert_eq!(source, &PathBuf::from("flood.json"));
                assert_eq!(palette, "Blues");
                assert_eq!(*opacity, 0.5);
            }
            other => panic!("expected raster, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_skipped() {
        let config = parse(concat!(
            "boundary: regions.geojson\n",
            "categories:\n",
            "- id: drought\n",
            "  layers:\n",
            "  - kind: choropleth\n",
            "    source: spi.json\n",
            "  - kind: markers\n",
        ));

        let layers = &config.categories[0].layers;
        assert_eq!(layers.len(), 1);
        assert!(matches!(&layers[0], LayerConfig::Markers { .. }));
    }

    #[test]
    fn test_sourceless_layers_skipped() {
        let config = parse(concat!(
            "boundary: regions.geojson\n",
            "categories:\n",
            "- id: rainfall\n",
            "  layers:\n",
            "  - kind: heatmap\n",
            "  - kind: raster\n",
        ));

        assert!(config.categories[0].layers.is_empty());
    }

    #[test]
    fn test_category_title_defaults_to_id() {
        let config = parse(concat!(
            "boundary: regions.geojson\n",
            "categories:\n",
            "- id: drought\n",
            "  layers:\n",
            "  - kind: markers\n",
        ));

        assert_eq!(config.categories[0].title, "drought");
        // The layer name falls back to the category title.
        assert_eq!(config.categories[0].layers[0].name(), "drought");
    }
}
