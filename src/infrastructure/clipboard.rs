//! Clipboard access through external command-line tools.
//!
//! Images are read with `pngpaste`, text is written with `pbcopy`.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::application::{ClipboardWriter, ImageSource};
use crate::domain::{AppError, CapturedImage, Result, ToolConfig};

/// Prefix for temp image files.
const TEMP_PREFIX: &str = "clipdown-";

/// Reads the clipboard image with a capture tool that takes an output path.
#[derive(Debug, Clone)]
pub struct PngPasteCapture {
    program: String,
    install_hint: String,
    temp_dir: Option<PathBuf>,
}

impl PngPasteCapture {
    #[must_use]
    pub fn new(program: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            install_hint: install_hint.into(),
            temp_dir: None,
        }
    }

    /// Create temp images in `dir` instead of the system temp directory.
    #[cfg(test)]
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(tools.capture.clone(), tools.capture_install_hint.clone())
    }
}

impl ImageSource for PngPasteCapture {
    fn capture(&self) -> Result<CapturedImage> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(".png");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| AppError::io("Failed to create temp image file", e))?;

        // Dropping `path` on an early return deletes the file.
        let path = file.into_temp_path();

        let output = match Command::new(&self.program).arg(&*path).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::ToolMissing {
                    tool: self.program.clone(),
                    install_hint: self.install_hint.clone(),
                });
            }
            Err(e) => {
                return Err(AppError::io(format!("Failed to run {}", self.program), e));
            }
        };

        if !output.status.success() {
            tracing::debug!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Capture tool reported no image"
            );
            return Err(AppError::NoImage);
        }

        Ok(CapturedImage::new(path))
    }
}

/// Writes text to the clipboard by piping it into a tool's stdin.
#[derive(Debug, Clone)]
pub struct PbcopyWriter {
    program: String,
    args: Vec<String>,
}

impl PbcopyWriter {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments passed before the text is piped in.
    #[cfg(test)]
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(tools.clipboard_write.clone())
    }
}

impl ClipboardWriter for PbcopyWriter {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| AppError::clipboard(format!("Failed to run {}", self.program), Some(e)))?;

        // Take stdin so it is closed before waiting; the tool reads until EOF.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                let _ = child.wait();
                return Err(AppError::clipboard("Failed to write to clipboard", Some(e)));
            }
        }

        let status = child
            .wait()
            .map_err(|e| AppError::clipboard(format!("Failed to wait for {}", self.program), Some(e)))?;

        if !status.success() {
            return Err(AppError::clipboard(
                format!("{} exited with {status}", self.program),
                None,
            ));
        }

        tracing::debug!(bytes = text.len(), "Wrote markdown to clipboard");
        Ok(())
    }
}
