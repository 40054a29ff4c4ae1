//! Collaborator interfaces used by the pipeline.
//!
//! The infrastructure layer provides the real implementations; tests plug in
//! in-memory fakes.

use std::path::Path;

use crate::domain::{CapturedImage, Credential, Result};

/// Source of the API credential.
pub trait CredentialSource {
    /// Resolve a non-empty credential.
    ///
    /// # Errors
    /// Returns `CredentialMissing` if no source provides one.
    fn load(&self) -> Result<Credential>;
}

/// Reads the clipboard image into a temp file.
pub trait ImageSource {
    /// Capture the clipboard image.
    ///
    /// # Errors
    /// Returns `ToolMissing` or `NoImage`; no temp file is left behind.
    fn capture(&self) -> Result<CapturedImage>;
}

/// Turns an image into markdown.
pub trait MarkdownConverter {
    /// Convert the PNG at `image` and return the generated text verbatim.
    ///
    /// # Errors
    /// Returns transport and API failures unmodified.
    fn convert(&self, image: &Path, credential: &Credential) -> Result<String>;
}

/// Replaces the clipboard text.
pub trait ClipboardWriter {
    /// Put `text` on the clipboard.
    ///
    /// # Errors
    /// Returns a clipboard error if the write tool fails.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Shows a desktop notification. Never fails.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}
