//! Layer descriptors: the immutable plan handed to the document emitter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::GeoBounds;

/// A finished boundary-masked overlay: encoded image plus placement.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    pub width: usize,
    pub height: usize,
    /// PNG stream with per-pixel alpha.
    pub png: Vec<u8>,
    /// Geographic rectangle the image stretches over.
    pub bounds: GeoBounds,
    /// Fill opacity applied inside the boundary, in [0, 1].
    pub opacity: f32,
}

/// A labelled point marker anchored inside a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// A weighted point feeding a client-side heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

/// Stroke and fill styling for the boundary outline.
///
/// Serializes with the camelCase keys Leaflet path options use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderStyle {
    pub color: String,
    pub weight: f32,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            color: "grey".to_string(),
            weight: 2.0,
            fill_color: "purple".to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// One renderable layer of the finished map.
#[derive(Debug, Clone)]
pub enum LayerDescriptor {
    /// The region outline drawn over the base map.
    Boundary {
        name: String,
        /// The source GeoJSON document, passed through to the page verbatim.
        geojson: Value,
        style: BorderStyle,
    },

    /// One labelled marker per region, placed by the anchor locator.
    Markers { name: String, markers: Vec<Marker> },

    /// Weighted points rendered client-side as a heat layer.
    Heatmap {
        name: String,
        points: Vec<HeatPoint>,
        /// Kernel radius in pixels.
        radius: u32,
        /// Kernel blur in pixels.
        blur: u32,
    },

    /// A boundary-masked raster overlay.
    Overlay { name: String, image: MaskedImage },
}

impl LayerDescriptor {
    /// Display name of the layer.
    pub fn name(&self) -> &str {
        match self {
            LayerDescriptor::Boundary { name, .. }
            | LayerDescriptor::Markers { name, .. }
            | LayerDescriptor::Heatmap { name, .. }
            | LayerDescriptor::Overlay { name, .. } => name,
        }
    }
}
