//! Application layer - the conversion pipeline and the interfaces it
//! drives.

pub mod pipeline;
pub mod ports;

pub use pipeline::Pipeline;
pub use ports::{ClipboardWriter, CredentialSource, ImageSource, MarkdownConverter, Notifier};
