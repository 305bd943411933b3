//! Error types for bridge calls.
//!
//! Two failure classes are kept strictly apart:
//!
//! - [`TransportError`]: the call itself could not complete (backend missing,
//!   crashed, timed out, or answered with something that is not an envelope).
//!   Shown to the operator as "cannot reach backend".
//! - [`CallError::Domain`]: the backend completed the call and reported
//!   `success: false`. Shown verbatim as "operation rejected".

use std::io;
use std::time::Duration;

use thiserror::Error;

/// A command envelope was built with a blank command name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("command name must not be empty")]
pub struct EmptyCommand;

/// The bridge could not complete a call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Backend executable could not be started
    #[error("failed to start backend `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Pipe I/O with the backend process failed
    #[error("backend I/O failed: {0}")]
    Io(#[from] io::Error),

    /// No answer within the configured timeout
    #[error("backend did not respond within {}s", .0.as_secs())]
    Timeout(Duration),

    /// Backend exited without producing a response
    #[error("backend exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    /// Response was not a valid result envelope
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Failure of a single bridge call as seen by menus and wizards.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("cannot reach backend: {0}")]
    Transport(#[from] TransportError),

    #[error("operation rejected: {message}")]
    Domain { command: String, message: String },

    /// Caller asked for a command that cannot be sent; nothing reached the backend
    #[error("invalid command: {0}")]
    Invalid(#[from] EmptyCommand),
}

impl CallError {
    pub fn is_transport(&self) -> bool {
        matches!(self, CallError::Transport(_))
    }

    /// A successful response whose payload lacks a field the caller needs
    pub fn missing_field(command: &str, field: &str) -> Self {
        CallError::Transport(TransportError::Malformed(format!(
            "`{}` response is missing `{}`",
            command, field
        )))
    }
}
