//! Domain-level error types for clipdown.
//!
//! All errors are typed with `thiserror`. Every variant maps onto one
//! [`FailureKind`], which decides the message the user finally sees.

use thiserror::Error;

use super::models::{FailureKind, Outcome, PipelineStage};

/// Application-level errors raised by the pipeline steps.
#[derive(Error, Debug)]
pub enum AppError {
    /// The clipboard capture tool is not installed.
    #[error("{tool} not found, run: {install_hint}")]
    ToolMissing {
        tool: String,
        install_hint: String,
    },

    /// The capture tool ran but the clipboard holds no image.
    #[error("No image found on clipboard")]
    NoImage,

    /// Neither the environment nor the `.env` file provides the API key.
    #[error("{key} not configured, check .env file")]
    CredentialMissing { key: String },

    /// Could not reach the generation endpoint.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The generation endpoint answered with an error or an unusable body.
    #[error("API error: {message}")]
    Api { message: String },

    /// Writing the result to the clipboard failed.
    #[error("Clipboard error: {message}")]
    Clipboard {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a clipboard error, optionally wrapping the IO cause.
    pub fn clipboard(message: impl Into<String>, err: Option<std::io::Error>) -> Self {
        Self::Clipboard {
            message: message.into(),
            source: err,
        }
    }

    /// Classify a transport error from the HTTP client.
    ///
    /// Connection and timeout failures are network errors; anything else
    /// the client reports (bad body, redirect loop, ...) is an API error.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Network {
                message: err.to_string(),
                source: Some(err),
            }
        } else {
            Self::Api {
                message: err.to_string(),
            }
        }
    }

    /// Failure category used for the user-facing message.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ToolMissing { .. } => FailureKind::ToolMissing,
            Self::NoImage => FailureKind::NoImage,
            Self::CredentialMissing { .. } => FailureKind::CredentialMissing,
            Self::Network { .. } => FailureKind::Network,
            Self::Api { .. } | Self::Clipboard { .. } | Self::Io { .. } => FailureKind::Api,
        }
    }

    /// Message shown in the desktop notification for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ToolMissing { .. } | Self::NoImage | Self::CredentialMissing { .. } => {
                self.to_string()
            }
            Self::Network { .. } => "Network error, check your connection".to_string(),
            Self::Api { .. } => self.to_string(),
            Self::Clipboard { message, .. } | Self::Io { message, .. } => {
                format!("API error: {message}")
            }
        }
    }
}

/// Failure reported before the pipeline could start.
impl From<&AppError> for Outcome {
    fn from(err: &AppError) -> Self {
        Self::Failure {
            kind: err.kind(),
            stage: PipelineStage::Init,
            message: err.user_message(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
