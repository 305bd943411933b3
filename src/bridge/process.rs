//! Bridge client backed by a backend executable
//!
//! Each call starts the configured program, writes the command envelope to
//! its stdin as one JSON document, closes stdin and reads the result envelope
//! from stdout. The call blocks until the process exits and its pipes close,
//! or the timeout fires. The timeout covers writing the request too.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::envelope::{CommandEnvelope, ResultEnvelope};
use super::error::TransportError;
use super::BridgeClient;
use crate::utils::{create_spinner, finish_spinner, hidden_spinner};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const MAX_STDERR_CHARS: usize = 400;

/// Bridge client that spawns the backend once per command
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    spinner: bool,
}

struct ProcessOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl ProcessBridge {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            spinner: false,
        }
    }

    /// Extra arguments passed to the backend on every call
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Show a spinner on stderr while a call is pending
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn exchange(&self, request: &str) -> Result<ProcessOutput, TransportError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        let deadline = Instant::now() + self.timeout;

        // Every pipe gets its own thread; only the poll loop below may block.
        let stdin = child
            .stdin
            .take()
            .map(|pipe| spawn_writer(pipe, format!("{}\n", request)));
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    kill_and_reap(&mut child);
                    return Err(TransportError::Io(e));
                }
            }
            if Instant::now() >= deadline {
                kill_and_reap(&mut child);
                return Err(TransportError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        // A grandchild can keep the pipes open after the backend exits
        if let Some(writer) = stdin {
            join_by(writer, deadline, self.timeout)?;
        }
        let stdout = match stdout {
            Some(reader) => join_by(reader, deadline, self.timeout)?,
            None => Vec::new(),
        };
        let stderr = match stderr {
            Some(reader) => join_by(reader, deadline, self.timeout)?,
            None => Vec::new(),
        };

        Ok(ProcessOutput {
            status,
            stdout,
            stderr,
        })
    }
}

impl BridgeClient for ProcessBridge {
    fn send(&self, envelope: &CommandEnvelope) -> Result<ResultEnvelope, TransportError> {
        let request = envelope.to_json()?;

        let spinner = if self.spinner {
            create_spinner(envelope.command())
        } else {
            hidden_spinner()
        };
        let start = Instant::now();
        let outcome = self.exchange(&request);
        finish_spinner(&spinner);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let output = match outcome {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    command = envelope.command(),
                    elapsed_ms,
                    error = %e,
                    "bridge transport failure"
                );
                return Err(e);
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_CHARS).collect();
            if !output.status.success() {
                return Err(TransportError::Exited {
                    status: output.status.to_string(),
                    stderr,
                });
            }
            return Err(TransportError::Malformed(
                "backend exited without a response".to_string(),
            ));
        }

        let result = ResultEnvelope::from_json(&stdout)?;
        tracing::debug!(
            command = envelope.command(),
            namespace = envelope.namespace(),
            elapsed_ms,
            success = result.is_success(),
            "bridge call complete"
        );
        Ok(result)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Write the request and close the pipe by dropping it
fn spawn_writer<W: Write + Send + 'static>(
    mut pipe: W,
    request: String,
) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || match pipe.write_all(request.as_bytes()) {
        // A backend that answers without reading its input closes the pipe early
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

/// Wait for a pipe thread, giving up at `deadline`.
///
/// A thread still running at the deadline is left detached; it ends once
/// whoever holds the other end of its pipe goes away.
fn join_by<T>(
    handle: JoinHandle<io::Result<T>>,
    deadline: Instant,
    timeout: Duration,
) -> Result<T, TransportError> {
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return Err(TransportError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
    handle
        .join()
        .map_err(|_| {
            TransportError::Io(io::Error::new(
                io::ErrorKind::Other,
                "backend pipe thread panicked",
            ))
        })?
        .map_err(TransportError::Io)
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
