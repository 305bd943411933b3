//! Outbound command envelopes and inbound result envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{CallError, EmptyCommand, TransportError};

/// Domain payload of a successful call.
pub type Data = Map<String, Value>;

/// Arguments for a backend command: either positional values or a single
/// keyed mapping. The shape is defined by the backend command, not the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandArgs {
    Positional(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl Default for CommandArgs {
    fn default() -> Self {
        CommandArgs::Positional(Vec::new())
    }
}

impl CommandArgs {
    /// No arguments
    pub fn none() -> Self {
        Self::default()
    }

    /// Positional arguments from anything convertible to JSON values
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CommandArgs::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Keyed arguments from `(key, value)` pairs
    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        CommandArgs::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse a raw JSON argument string (array or object)
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| format!("Arguments are not valid JSON: {}", e))?;
        match value {
            Value::Array(items) => Ok(CommandArgs::Positional(items)),
            Value::Object(map) => Ok(CommandArgs::Keyed(map)),
            other => Err(format!(
                "Arguments must be a JSON array or object, got {}",
                json_kind(&other)
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CommandArgs::Positional(items) => items.is_empty(),
            CommandArgs::Keyed(map) => map.is_empty(),
        }
    }
}

/// Outbound request: a dotted command name plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEnvelope {
    command: String,
    args: CommandArgs,
}

impl CommandEnvelope {
    /// Create an envelope. The command name must not be blank.
    pub fn new(command: impl Into<String>, args: CommandArgs) -> Result<Self, EmptyCommand> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(EmptyCommand);
        }
        Ok(Self { command, args })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &CommandArgs {
        &self.args
    }

    /// Namespace part of the command (`agents` in `agents.create`)
    pub fn namespace(&self) -> &str {
        self.command
            .split_once('.')
            .map(|(ns, _)| ns)
            .unwrap_or(&self.command)
    }

    /// Encode as a single JSON document for the wire
    pub fn to_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(self)
            .map_err(|e| TransportError::Malformed(format!("cannot encode request: {}", e)))
    }
}

/// Wire shape of a response before the envelope invariants are checked
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Inbound response with the envelope invariants enforced by construction:
/// a success never carries an error, a failure always carries a non-empty one.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    Success { data: Data },
    Failure { error: String },
}

impl ResultEnvelope {
    pub fn success(data: Data) -> Self {
        ResultEnvelope::Success { data }
    }

    /// Build a failure envelope. A blank message is replaced so the
    /// non-empty-error invariant still holds.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unspecified backend error".to_string()
        } else {
            error
        };
        ResultEnvelope::Failure { error }
    }

    /// Decode a JSON response, rejecting anything that breaks the invariants.
    pub fn from_json(raw: &str) -> Result<Self, TransportError> {
        let raw: RawEnvelope = serde_json::from_str(raw.trim())
            .map_err(|e| TransportError::Malformed(format!("invalid JSON envelope: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Decode from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, TransportError> {
        let raw: RawEnvelope = serde_json::from_value(value)
            .map_err(|e| TransportError::Malformed(format!("invalid JSON envelope: {}", e)))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnvelope) -> Result<Self, TransportError> {
        if raw.success {
            if let Some(error) = raw.error {
                return Err(TransportError::Malformed(format!(
                    "successful response also carries an error: {}",
                    error
                )));
            }
            let data = match raw.data {
                None | Some(Value::Null) => Map::new(),
                Some(Value::Object(map)) => map,
                Some(other) => {
                    return Err(TransportError::Malformed(format!(
                        "response data must be a mapping, got {}",
                        json_kind(&other)
                    )))
                }
            };
            Ok(ResultEnvelope::Success { data })
        } else {
            // data on a failed call is never trusted, so it is dropped here
            match raw.error {
                Some(error) if !error.trim().is_empty() => Ok(ResultEnvelope::Failure { error }),
                _ => Err(TransportError::Malformed(
                    "failed response is missing its error message".to_string(),
                )),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn data(&self) -> Option<&Data> {
        match self {
            ResultEnvelope::Success { data } => Some(data),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error } => Some(error),
        }
    }

    /// Gate on `success`: the data of a success, or a domain error.
    pub fn into_data(self, command: &str) -> Result<Data, CallError> {
        match self {
            ResultEnvelope::Success { data } => Ok(data),
            ResultEnvelope::Failure { error } => Err(CallError::Domain {
                command: command.to_string(),
                message: error,
            }),
        }
    }

    /// Wire form, used by the one-shot `call` command
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            ResultEnvelope::Success { data } => {
                map.insert("success".into(), Value::Bool(true));
                map.insert("data".into(), Value::Object(data.clone()));
            }
            ResultEnvelope::Failure { error } => {
                map.insert("success".into(), Value::Bool(false));
                map.insert("error".into(), Value::String(error.clone()));
            }
        }
        Value::Object(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
