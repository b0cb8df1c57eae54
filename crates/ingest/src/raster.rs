//! Raster document loading.

use std::fs;
use std::path::Path;

use serde_json::Value;

use map_common::{GeoBounds, RasterGrid};

use crate::error::IngestResult;

/// Load a raster grid from a JSON document.
///
/// Accepts the shapes `RasterGrid::from_value` understands; grids without
/// their own bounds are positioned by `default_bounds`.
pub fn load_raster(path: &Path, default_bounds: GeoBounds) -> IngestResult<RasterGrid> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    Ok(RasterGrid::from_value(&document, default_bounds)?)
}
