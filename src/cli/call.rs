//! One-shot dispatch of a single bridge command

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use crate::bridge::{BridgeClient, CommandArgs, CommandEnvelope, ResultEnvelope};

/// Send `command` with optional JSON arguments and return the envelope.
///
/// Arguments must be a JSON array (positional) or object (keyed). A
/// transport failure is an error; a domain failure is a normal envelope.
pub fn dispatch(
    bridge: &dyn BridgeClient,
    command: &str,
    raw_args: Option<&str>,
) -> Result<ResultEnvelope> {
    let args = match raw_args {
        Some(raw) => CommandArgs::from_json(raw).map_err(anyhow::Error::msg)?,
        None => CommandArgs::none(),
    };
    let envelope =
        CommandEnvelope::new(command, args).context("Invalid command for `call`")?;

    let started = Instant::now();
    let result = bridge
        .send(&envelope)
        .with_context(|| format!("Cannot reach backend for `{}`", command))?;
    tracing::info!(
        command,
        elapsed_ms = started.elapsed().as_millis() as u64,
        success = result.is_success(),
        "one-shot call"
    );
    Ok(result)
}

/// Run the `call` subcommand. Returns whether the backend reported success.
pub fn run_call(bridge: &dyn BridgeClient, command: &str, raw_args: Option<&str>) -> Result<bool> {
    let result = dispatch(bridge, command, raw_args)?;
    let pretty = serde_json::to_string_pretty(&result.to_value())
        .context("Failed to format result envelope")?;
    println!("{}", pretty);

    if let Some(error) = result.error() {
        eprintln!("{} {}", style("✗").red().bold(), error);
    }
    Ok(result.is_success())
}
