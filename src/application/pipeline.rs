//! Clipboard-to-markdown pipeline.
//!
//! Runs the steps once, in order, stops at the first failure, notifies the
//! user, and always removes the captured temp image.

use crate::domain::{CapturedImage, Outcome, PipelineStage, Result};

use super::ports::{ClipboardWriter, CredentialSource, ImageSource, MarkdownConverter, Notifier};

/// Single-run orchestrator over the five collaborators.
pub struct Pipeline<'a> {
    credentials: &'a dyn CredentialSource,
    images: &'a dyn ImageSource,
    converter: &'a dyn MarkdownConverter,
    clipboard: &'a dyn ClipboardWriter,
    notifier: &'a dyn Notifier,
    title: String,
    success_message: String,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline. `title` heads every notification and
    /// `success_message` is shown when the markdown reaches the clipboard.
    #[must_use]
    pub fn new(
        credentials: &'a dyn CredentialSource,
        images: &'a dyn ImageSource,
        converter: &'a dyn MarkdownConverter,
        clipboard: &'a dyn ClipboardWriter,
        notifier: &'a dyn Notifier,
        title: impl Into<String>,
        success_message: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            images,
            converter,
            clipboard,
            notifier,
            title: title.into(),
            success_message: success_message.into(),
        }
    }

    /// Run the pipeline once and report the outcome.
    pub fn run(&self) -> Outcome {
        let mut stage = PipelineStage::Init;
        let mut image: Option<CapturedImage> = None;

        let result = self.execute(&mut stage, &mut image);

        if let Some(image) = image.take() {
            image.discard();
        }

        let outcome = match result {
            Ok(()) => {
                tracing::info!(stage = %stage, "Conversion finished");
                Outcome::Success {
                    message: self.success_message.clone(),
                }
            }
            Err(e) => {
                tracing::warn!(stage = %stage, error = %e, "Conversion failed");
                Outcome::Failure {
                    kind: e.kind(),
                    stage,
                    message: e.user_message(),
                }
            }
        };

        self.notifier.notify(&self.title, outcome.message());
        outcome
    }

    /// The steps proper. The captured image is parked in `image` so `run`
    /// can release it whichever step fails.
    fn execute(
        &self,
        stage: &mut PipelineStage,
        image: &mut Option<CapturedImage>,
    ) -> Result<()> {
        let credential = self.credentials.load()?;
        *stage = PipelineStage::CredentialLoaded;

        let captured = image.insert(self.images.capture()?);
        *stage = PipelineStage::ImageCaptured;
        tracing::debug!(path = %captured.path().display(), "Captured clipboard image");

        let markdown = self.converter.convert(captured.path(), &credential)?;
        *stage = PipelineStage::Converted;
        tracing::debug!(bytes = markdown.len(), "Received markdown");

        self.clipboard.write_text(&markdown)?;
        *stage = PipelineStage::ClipboardWritten;

        *stage = PipelineStage::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::domain::{AppError, Credential, FailureKind};

    struct FakeCredentials(Option<&'static str>);

    impl CredentialSource for FakeCredentials {
        fn load(&self) -> Result<Credential> {
            self.0
                .map(|key| Credential::new(key.to_string()))
                .ok_or_else(|| AppError::CredentialMissing {
                    key: "GEMINI_API_KEY".into(),
                })
        }
    }

    /// Writes a real temp file so cleanup can be checked on disk.
    struct FakeImages {
        fail_with: Option<fn() -> AppError>,
        created: RefCell<Option<PathBuf>>,
    }

    impl FakeImages {
        fn ok() -> Self {
            Self {
                fail_with: None,
                created: RefCell::new(None),
            }
        }

        fn failing(make: fn() -> AppError) -> Self {
            Self {
                fail_with: Some(make),
                created: RefCell::new(None),
            }
        }

        fn created_path(&self) -> Option<PathBuf> {
            self.created.borrow().clone()
        }
    }

    impl ImageSource for FakeImages {
        fn capture(&self) -> Result<CapturedImage> {
            if let Some(make) = self.fail_with {
                return Err(make());
            }
            let file = tempfile::Builder::new()
                .suffix(".png")
                .tempfile()
                .map_err(|e| AppError::io("temp", e))?;
            std::fs::write(file.path(), b"\x89PNG fake").map_err(|e| AppError::io("write", e))?;
            let path = file.into_temp_path();
            *self.created.borrow_mut() = Some(path.to_path_buf());
            Ok(CapturedImage::new(path))
        }
    }

    struct FakeConverter {
        reply: std::result::Result<&'static str, fn() -> AppError>,
        saw_image: RefCell<bool>,
    }

    impl FakeConverter {
        fn replying(text: &'static str) -> Self {
            Self {
                reply: Ok(text),
                saw_image: RefCell::new(false),
            }
        }

        fn failing(make: fn() -> AppError) -> Self {
            Self {
                reply: Err(make),
                saw_image: RefCell::new(false),
            }
        }
    }

    impl MarkdownConverter for FakeConverter {
        fn convert(&self, image: &Path, credential: &Credential) -> Result<String> {
            assert_eq!(credential.expose(), "test-key");
            *self.saw_image.borrow_mut() = image.exists();
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        contents: RefCell<Option<String>>,
        fail: bool,
    }

    impl ClipboardWriter for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::clipboard("pbcopy exited with status 1", None));
            }
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, title: &str, message: &str) {
            self.sent
                .borrow_mut()
                .push((title.to_string(), message.to_string()));
        }
    }

    const TITLE: &str = "Clipboard → MD";
    const SUCCESS: &str = "Markdown copied to clipboard ✓";

    fn run_with(
        credentials: &FakeCredentials,
        images: &FakeImages,
        converter: &FakeConverter,
        clipboard: &FakeClipboard,
        notifier: &FakeNotifier,
    ) -> Outcome {
        Pipeline::new(
            credentials,
            images,
            converter,
            clipboard,
            notifier,
            TITLE,
            SUCCESS,
        )
        .run()
    }

    #[test]
    fn test_success_copies_markdown_verbatim() {
        let images = FakeImages::ok();
        let converter = FakeConverter::replying("# Title\n\nBody text");
        let clipboard = FakeClipboard::default();
        let notifier = FakeNotifier::default();

        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &images,
            &converter,
            &clipboard,
            &notifier,
        );

        assert!(outcome.is_success());
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(
            clipboard.contents.borrow().as_deref(),
            Some("# Title\n\nBody text")
        );
        assert!(*converter.saw_image.borrow());

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, TITLE);
        assert_eq!(sent[0].1, SUCCESS);

        let created = images.created_path().unwrap();
        assert!(!created.exists());
    }

    #[test]
    fn test_missing_credential_stops_before_capture() {
        let images = FakeImages::ok();
        let clipboard = FakeClipboard::default();
        let notifier = FakeNotifier::default();

        let outcome = run_with(
            &FakeCredentials(None),
            &images,
            &FakeConverter::replying("unused"),
            &clipboard,
            &notifier,
        );

        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.message().contains("not configured"));
        assert!(matches!(
            outcome,
            Outcome::Failure {
                kind: FailureKind::CredentialMissing,
                stage: PipelineStage::Init,
                ..
            }
        ));
        assert!(images.created_path().is_none());
        assert!(clipboard.contents.borrow().is_none());
        assert_eq!(notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn test_capture_failures_keep_their_category() {
        let notifier = FakeNotifier::default();
        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &FakeImages::failing(|| AppError::ToolMissing {
                tool: "pngpaste".into(),
                install_hint: "brew install pngpaste".into(),
            }),
            &FakeConverter::replying("unused"),
            &FakeClipboard::default(),
            &notifier,
        );
        assert!(matches!(
            outcome,
            Outcome::Failure {
                kind: FailureKind::ToolMissing,
                ..
            }
        ));
        assert!(notifier.sent.borrow()[0].1.contains("pngpaste not found"));

        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &FakeImages::failing(|| AppError::NoImage),
            &FakeConverter::replying("unused"),
            &FakeClipboard::default(),
            &FakeNotifier::default(),
        );
        assert!(matches!(
            outcome,
            Outcome::Failure {
                kind: FailureKind::NoImage,
                stage: PipelineStage::CredentialLoaded,
                ..
            }
        ));
    }

    #[test]
    fn test_generic_converter_error_is_reported_as_api_error() {
        let images = FakeImages::ok();
        let clipboard = FakeClipboard::default();
        let notifier = FakeNotifier::default();

        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &images,
            &FakeConverter::failing(|| {
                AppError::io("Failed to read image", std::io::Error::other("boom"))
            }),
            &clipboard,
            &notifier,
        );

        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.message().starts_with("API error:"));
        assert!(notifier.sent.borrow()[0].1.starts_with("API error:"));
        assert!(clipboard.contents.borrow().is_none());
        assert!(!images.created_path().unwrap().exists());
    }

    #[test]
    fn test_network_error_message() {
        let images = FakeImages::ok();
        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &images,
            &FakeConverter::failing(|| AppError::Network {
                message: "connection refused".into(),
                source: None,
            }),
            &FakeClipboard::default(),
            &FakeNotifier::default(),
        );

        assert_eq!(outcome.message(), "Network error, check your connection");
        assert!(matches!(
            outcome,
            Outcome::Failure {
                kind: FailureKind::Network,
                stage: PipelineStage::ImageCaptured,
                ..
            }
        ));
        assert!(!images.created_path().unwrap().exists());
    }

    #[test]
    fn test_clipboard_failure_still_removes_image() {
        let images = FakeImages::ok();
        let clipboard = FakeClipboard {
            fail: true,
            ..FakeClipboard::default()
        };

        let outcome = run_with(
            &FakeCredentials(Some("test-key")),
            &images,
            &FakeConverter::replying("# Title"),
            &clipboard,
            &FakeNotifier::default(),
        );

        assert!(matches!(
            outcome,
            Outcome::Failure {
                kind: FailureKind::Api,
                stage: PipelineStage::Converted,
                ..
            }
        ));
        assert!(outcome.message().starts_with("API error:"));
        assert!(!images.created_path().unwrap().exists());
    }

    #[test]
    fn test_success_text_comes_from_construction() {
        let notifier = FakeNotifier::default();

        let outcome = Pipeline::new(
            &FakeCredentials(Some("test-key")),
            &FakeImages::ok(),
            &FakeConverter::replying("# Title"),
            &FakeClipboard::default(),
            &notifier,
            "Custom title",
            "Copied!",
        )
        .run();

        assert_eq!(outcome.message(), "Copied!");
        assert_eq!(
            notifier.sent.borrow().as_slice(),
            [("Custom title".to_string(), "Copied!".to_string())]
        );
    }
}
