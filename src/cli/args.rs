//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hivectl - Operator console for a hive of trading agents
#[derive(Parser, Debug)]
#[command(name = "hivectl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend executable that answers bridge commands.
    /// Overrides `[backend] program` in the config file.
    #[arg(short, long, env = "HIVECTL_BACKEND")]
    pub backend: Option<PathBuf>,

    /// Extra argument passed to the backend executable (repeatable)
    #[arg(long = "backend-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub backend_args: Vec<String>,

    /// Seconds to wait for the backend before a call fails (1-3600)
    #[arg(short, long, env = "HIVECTL_TIMEOUT", value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// Config file path. Defaults to `<config dir>/hivectl/config.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Width of the consensus vote bar in characters (10-120)
    #[arg(long, value_parser = validate_bar_width)]
    pub bar_width: Option<usize>,

    /// Do not show a spinner while waiting for the backend
    #[arg(long, default_value = "false")]
    pub no_spinner: bool,

    /// Log at debug level
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one command to the backend and print the result envelope
    Call {
        /// Dotted command name, e.g. `agents.list`
        command: String,

        /// Arguments as a JSON array (positional) or object (keyed)
        args: Option<String>,
    },
}

/// Validator for the per-call timeout
pub fn validate_timeout(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of seconds", s))?;

    if !(1..=3600).contains(&value) {
        Err(format!("timeout must be between 1 and 3600 seconds, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the vote bar width
pub fn validate_bar_width(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid width", s))?;

    if !(10..=120).contains(&value) {
        Err(format!("bar width must be between 10 and 120, got {}", value))
    } else {
        Ok(value)
    }
}
