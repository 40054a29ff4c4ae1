//! Infrastructure layer - external adapters (environment, clipboard tools,
//! Gemini API, notifications).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod clipboard;
pub mod credentials;
pub mod gemini;
pub mod notifier;

pub use clipboard::{PbcopyWriter, PngPasteCapture};
pub use credentials::DotenvCredentials;
pub use gemini::GeminiClient;
pub use notifier::OsascriptNotifier;
