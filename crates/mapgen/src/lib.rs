//! Hazard map builder library.
//!
//! This module exposes the internal modules for testing purposes.
//! The pipeline runs in three stages:
//!
//! - `config` loads the YAML map description
//! - `pipeline` assembles the plan: boundary, markers, heat and raster layers
//! - `document` renders the plan into one self-contained HTML page

pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;

pub use config::{CategoryConfig, LayerConfig, MapConfig};
pub use document::{render_document, write_document};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{build_plan, MapPlan, PlannedLayer};
