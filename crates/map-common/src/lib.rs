//! Common types and utilities shared across all hazmap crates.

pub mod bounds;
pub mod error;
pub mod grid;
pub mod layer;

pub use bounds::{GeoBounds, DEFAULT_BOUNDS};
pub use error::{RenderError, RenderResult};
pub use grid::RasterGrid;
pub use layer::{BorderStyle, HeatPoint, LayerDescriptor, Marker, MaskedImage};
