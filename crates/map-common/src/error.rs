//! Error types for hazmap rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Primary error type for rendering operations.
///
/// All variants are recoverable at the layer level: the pipeline logs the
/// failure, drops the layer, and keeps building the map.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// Every raster cell fell outside the boundary (or held no data).
    #[error("No raster cells fall inside the boundary")]
    EmptyMask,

    /// The raster document matched none of the supported shapes.
    #[error("Unsupported raster shape: {0}")]
    UnsupportedRasterShape(String),

    /// The requested palette name is not registered.
    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    /// PNG encoding failed.
    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),
}
