//! Domain layer - core types for a conversion run.
//!
//! This layer contains plain models, configuration and error types
//! without any I/O of its own.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, GeminiConfig, ToolConfig};
pub use error::{AppError, Result};
pub use models::{CapturedImage, Credential, FailureKind, Outcome, PipelineStage};
