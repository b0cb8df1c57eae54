//! Error types for the ingest crate.

use map_common::RenderError;
use thiserror::Error;

/// Errors that can occur while loading map inputs.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("No usable regions in {0}")]
    NoRegions(String),

    #[error("CSV error at line {line}: {message}")]
    Csv { line: usize, message: String },
}

/// Result type for ingest operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
