//! CLI interface using clap.
//!
//! The tool takes no subcommands; flags only tweak the single run.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::AppConfig;

/// Clipdown - turn the image on the clipboard into markdown.
///
/// Reads the clipboard image, asks Gemini for markdown, copies the result
/// back and shows a notification.
#[derive(Parser, Debug)]
#[command(name = "clipdown")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Gemini model to use.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Path to the `.env` file holding `GEMINI_API_KEY`.
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Build the run configuration from defaults and flags.
    #[must_use]
    pub fn to_config(&self) -> AppConfig {
        let mut config = AppConfig {
            env_file: self.env_file.clone(),
            ..AppConfig::default()
        };

        if let Some(model) = &self.model {
            config.gemini.model.clone_from(model);
        }
        if let Some(timeout) = self.timeout {
            config.gemini.timeout_secs = timeout;
        }

        config
    }
}
