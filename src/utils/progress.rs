//! Spinner helpers using indicatif

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for a backend call in flight.
///
/// Draws to stderr and hides itself when stderr is not a terminal.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("    {spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A spinner that does nothing, for when progress output is turned off
pub fn hidden_spinner() -> ProgressBar {
    ProgressBar::hidden()
}

/// Remove the spinner line once the call has returned
pub fn finish_spinner(pb: &ProgressBar) {
    pb.finish_and_clear();
}
