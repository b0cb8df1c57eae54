//! Error types for map building.

use thiserror::Error;

use ingest::IngestError;

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that stop a map build outright.
///
/// Per-layer problems never surface here; the pipeline logs them and drops
/// the layer. These variants cover the inputs a build cannot go on without:
/// the configuration, the boundary file, and the output path.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    ConfigRead(std::io::Error),

    /// The configuration file is not valid YAML.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The boundary file failed to load.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The output document could not be written.
    #[error("Failed to write document: {0}")]
    DocumentWrite(std::io::Error),
}
