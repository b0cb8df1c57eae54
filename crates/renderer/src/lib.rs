//! Raster overlay rendering for hazard maps.
//!
//! Turns a gridded hazard indicator into a PNG overlay:
//! - Named color palettes (ColorBrewer-style ramps)
//! - Boundary masking via point-in-polygon rasterization
//! - Indexed or RGBA PNG encoding

pub mod mask;
pub mod overlay;
pub mod palette;
pub mod png;

pub use mask::BoundaryMask;
pub use overlay::{render, DEFAULT_OPACITY};
pub use palette::{Color, ColorRamp};
