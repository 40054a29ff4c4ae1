//! Clipdown - convert the image on the clipboard to markdown.
//!
//! Grabs the clipboard image with `pngpaste`, sends it to Gemini with a fixed
//! instruction, copies the returned markdown back with `pbcopy`, and reports
//! the result through a macOS notification.
//!
//! Exit status is 0 on success and 1 on any failure.

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{Notifier, Pipeline};
use cli::Cli;
use domain::Outcome;
use infrastructure::{
    DotenvCredentials, GeminiClient, OsascriptNotifier, PbcopyWriter, PngPasteCapture,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    let outcome = run(&cli);

    if let Outcome::Failure {
        kind,
        stage,
        message,
    } = &outcome
    {
        tracing::debug!(?kind, %stage, "Run failed");
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    std::process::exit(outcome.exit_code());
}

/// Wire up the real collaborators and run the pipeline once.
fn run(cli: &Cli) -> Outcome {
    let config = cli.to_config();
    let notifier = OsascriptNotifier::from_config(&config.tools);

    let converter = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up Gemini client");
            let outcome = Outcome::from(&e);
            notifier.notify(&config.notification_title, outcome.message());
            return outcome;
        }
    };

    let credentials = DotenvCredentials::from_config(&config);
    let images = PngPasteCapture::from_config(&config.tools);
    let clipboard = PbcopyWriter::from_config(&config.tools);

    Pipeline::new(
        &credentials,
        &images,
        &converter,
        &clipboard,
        &notifier,
        config.notification_title.clone(),
        config.success_message.clone(),
    )
    .run()
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
