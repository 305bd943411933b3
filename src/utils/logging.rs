//! Tracing setup
//!
//! The interactive console owns the terminal, so its logs go to a file
//! (`<config_dir>/hivectl/hivectl.log`). One-shot commands log to stderr.
//! `RUST_LOG` always overrides the default level.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Directory holding the log file and the default config file
pub fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hivectl"))
}

fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose).to_string()))
}

/// File logging for the interactive console.
///
/// Returns the log path. If the file cannot be opened a warning is printed
/// and the console runs without logging.
pub fn init_file(verbose: bool) -> Option<PathBuf> {
    match init_file_inner(verbose) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Warning: failed to set up file logging: {:#}", e);
            None
        }
    }
}

fn init_file_inner(verbose: bool) -> Result<PathBuf> {
    let dir = app_dir().context("could not determine config directory")?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join("hivectl.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(path)
}

/// Stderr logging for one-shot commands
pub fn init_stderr(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .try_init();
}
