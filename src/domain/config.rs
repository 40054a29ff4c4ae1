//! Run configuration.
//!
//! Built once from defaults and command-line flags, then handed to each
//! component by value or reference. Nothing here changes during a run.

use std::path::PathBuf;
use std::time::Duration;

/// Title used for every desktop notification.
pub const NOTIFICATION_TITLE: &str = "Clipboard → MD";

/// Notification text after a successful run.
pub const SUCCESS_MESSAGE: &str = "Markdown copied to clipboard ✓";

/// Instruction sent alongside the image.
pub const SYSTEM_PROMPT: &str = "Convert this image to clean, well-structured markdown. \
Rules: Output ONLY the markdown content, no commentary or explanation; \
no wrapping code fences; \
preserve logical structure (headings, lists, tables, code blocks); \
use fenced code blocks with language tags for code; \
use standard markdown table syntax for tables; \
be precise with text content, no paraphrasing or summarizing.";

/// Environment variable and `.env` key holding the API key.
pub const CREDENTIAL_KEY: &str = "GEMINI_API_KEY";

/// External programs the pipeline shells out to.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Writes the clipboard image to the path given as its only argument.
    pub capture: String,

    /// Shown when `capture` is not installed.
    pub capture_install_hint: String,

    /// Reads text on stdin and puts it on the clipboard.
    pub clipboard_write: String,

    /// Runs an `AppleScript` snippet passed with `-e`.
    pub notifier: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            capture: "pngpaste".into(),
            capture_install_hint: "brew install pngpaste".into(),
            clipboard_write: "pbcopy".into(),
            notifier: "osascript".into(),
        }
    }
}

/// Gemini endpoint settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model identifier.
    pub model: String,

    /// Base URL, without trailing slash.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Instruction sent with the image.
    pub system_prompt: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full `generateContent` URL for the configured model.
    #[must_use]
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

const fn default_timeout_secs() -> u64 {
    60
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote model settings.
    pub gemini: GeminiConfig,

    /// External tool names.
    pub tools: ToolConfig,

    /// Explicit `.env` path; defaults to one next to the executable.
    pub env_file: Option<PathBuf>,

    /// Key looked up in the environment and in the `.env` file.
    pub credential_key: String,

    /// Title for notifications.
    pub notification_title: String,

    /// Notification text after a successful run.
    pub success_message: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            tools: ToolConfig::default(),
            env_file: None,
            credential_key: CREDENTIAL_KEY.to_string(),
            notification_title: NOTIFICATION_TITLE.to_string(),
            success_message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// The `.env` file to consult when the environment has no key.
    #[must_use]
    pub fn env_file_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(Self::default_env_file)
    }

    /// `.env` next to the running executable, or in the working directory
    /// if the executable path is unknown.
    #[must_use]
    pub fn default_env_file() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
            .unwrap_or_else(|| PathBuf::from(".env"))
    }
}
