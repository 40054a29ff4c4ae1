//! Domain models for a single clipboard conversion run.
//!
//! Everything here is transient: nothing outlives the process.

use std::fmt;
use std::path::Path;

use tempfile::TempPath;

/// API token for the generation service.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The raw token, for the request header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// PNG image pulled off the clipboard into a temp file.
///
/// The file is removed by [`CapturedImage::discard`], or by `Drop` if the
/// value is dropped without being discarded.
#[derive(Debug)]
pub struct CapturedImage {
    path: TempPath,
}

impl CapturedImage {
    /// Take ownership of a temp file holding the image.
    #[must_use]
    pub const fn new(path: TempPath) -> Self {
        Self { path }
    }

    /// Location of the image on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the temp file. Removal errors are logged and dropped.
    pub fn discard(self) {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => tracing::debug!(path = %shown, "Removed temp image"),
            Err(e) => tracing::debug!(path = %shown, error = %e, "Failed to remove temp image"),
        }
    }
}

/// How far a run got before it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Init,
    CredentialLoaded,
    ImageCaptured,
    Converted,
    ClipboardWritten,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::CredentialLoaded => "credential-loaded",
            Self::ImageCaptured => "image-captured",
            Self::Converted => "converted",
            Self::ClipboardWritten => "clipboard-written",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Category of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Capture tool not installed.
    ToolMissing,
    /// Clipboard had no image.
    NoImage,
    /// No API key in env or `.env`.
    CredentialMissing,
    /// Endpoint unreachable.
    Network,
    /// Catch-all for API and other uncategorized failures.
    Api,
}

/// Final result of a run, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Markdown is on the clipboard.
    Success { message: String },
    /// The run stopped early.
    Failure {
        kind: FailureKind,
        stage: PipelineStage,
        message: String,
    },
}

impl Outcome {
    /// Notification text for this outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message, .. } => message,
        }
    }

    /// Process exit code: 0 on success, 1 on any failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Failure { .. } => 1,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
