mod app;
mod config;
mod document;
mod keys;
mod render;
mod search;
mod syntax;
mod terminal;
mod viewport;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "quill", version, about = "Small terminal text editor")]
struct Cli {
    /// File to open; created empty if it does not exist
    file: Option<PathBuf>,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Append diagnostic logs to this file (also `QUILL_LOG_FILE`)
    #[arg(long, value_name = "PATH", env = "QUILL_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        setup_tracing(path)?;
    }

    let cfg = config::load_config(cli.config.as_deref())?;
    app::run_app(cli.file, cfg)
}

// The terminal owns stdout and stderr, so logs only ever go to a file.
fn setup_tracing(path: &Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quill=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(path = %path.display(), "tracing initialized");
    Ok(())
}
