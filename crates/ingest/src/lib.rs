//! Input loading for hazard maps.
//!
//! Turns the files analysts hand over into the types the pipeline works
//! with:
//!
//! - GeoJSON boundary files into named regions
//! - GeoJSON point files into weighted heat points
//! - JSON raster documents into positioned grids
//! - CSV observation exports into GeoJSON (the `convert` subcommand)

pub mod csv;
pub mod error;
pub mod geojson;
pub mod raster;

// Re-exports
pub use csv::convert_csv;
pub use error::{IngestError, IngestResult};
pub use geojson::{load_heat_points, load_regions, regions_from_value};
pub use raster::load_raster;
