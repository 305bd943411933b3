//! Bridge module - the command-dispatch channel to the compute backend
//!
//! Every remote operation goes through [`BridgeClient::send`], which either
//! returns a normalized [`ResultEnvelope`] or fails the whole call with a
//! [`TransportError`]. Domain failures (`success: false`) are part of the
//! envelope, never a transport error.

pub mod commands;
pub mod envelope;
pub mod error;
pub mod process;

pub use envelope::*;
pub use error::*;
pub use process::ProcessBridge;

/// Synchronous request/response channel to the backend.
///
/// The calling flow is suspended until the backend answers, the call times
/// out, or the transport fails.
pub trait BridgeClient {
    fn send(&self, envelope: &CommandEnvelope) -> Result<ResultEnvelope, TransportError>;

    /// Build an envelope, send it, and gate on `success`.
    ///
    /// Returns the `data` mapping of a successful envelope, or a
    /// [`CallError`] that keeps transport and domain failures apart.
    fn call(&self, command: &str, args: CommandArgs) -> Result<Data, CallError> {
        let envelope = CommandEnvelope::new(command, args)?;
        let result = self.send(&envelope)?;
        result.into_data(command)
    }
}
