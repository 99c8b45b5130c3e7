//! Growthscreen: Weight-status screening for children and adolescents.
//!
//! Main entry point for the command-line application.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use growthscreen::cli::{self, Cli};

fn main() -> Result<ExitCode> {
    // Initialize logging.
    //
    // Stdout carries the report, so logs go to stderr (default) or a file.
    let log_mode = std::env::var("GROWTHSCREEN_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let (writer, _guard) = if log_mode == "file" {
        let log_file = std::env::var("GROWTHSCREEN_LOG_FILE")
            .unwrap_or_else(|_| "growthscreen.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("Parsed arguments: {:?}", cli);

    let code = cli::run(cli)?;

    tracing::debug!("Growthscreen finished.");
    Ok(code)
}
