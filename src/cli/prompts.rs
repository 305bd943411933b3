//! Interactive prompts
//!
//! [`PromptGateway`] is the input surface the menus and wizards talk to. It
//! covers four prompt kinds: a choice from a labeled list, a yes/no
//! confirmation, free text checked by a validator, and multi-field forms.
//! Validation failures re-prompt the same field and never escalate.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::utils::print_warning;

/// Input rejected by a validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The prompt surface itself failed
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("input stream closed")]
    Closed,
}

/// Field validator: pass, or fail with a message for the operator
pub type Validator = fn(&str) -> Result<(), ValidationError>;

/// How a form field's text is converted into an argument value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

impl FieldKind {
    fn to_value(self, raw: &str) -> Value {
        match self {
            FieldKind::Text => Value::String(raw.to_string()),
            FieldKind::Number => {
                if let Ok(i) = raw.parse::<i64>() {
                    Value::from(i)
                } else {
                    raw.parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or_else(|| Value::String(raw.to_string()))
                }
            }
        }
    }
}

/// One field of a multi-field form
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: Option<String>,
    pub validator: Validator,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str, validator: Validator) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            default: None,
            validator,
        }
    }

    pub fn number(key: &'static str, label: &'static str, validator: Validator) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(key, label, validator)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Values collected by a form, keyed by field key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(Map<String, Value>);

impl FormValues {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Input surface used by menus and wizards.
///
/// Implementors provide the raw prompt primitives; validation loops and
/// forms are built on top of them here.
pub trait PromptGateway {
    /// Choose one item. `None` means the operator backed out (Esc).
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, PromptError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError>;

    /// Read one line of text, unvalidated
    fn read_line(&mut self, prompt: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Tell the operator why the last input was rejected
    fn invalid(&mut self, error: &ValidationError);

    /// Free text that must pass `validator`. Blank input takes the default.
    fn text(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validator: &dyn Fn(&str) -> Result<(), ValidationError>,
    ) -> Result<String, PromptError> {
        loop {
            let raw = self.read_line(prompt, default)?;
            let value = match raw.trim() {
                "" => default.unwrap_or("").trim(),
                trimmed => trimmed,
            };
            match validator(value) {
                Ok(()) => return Ok(value.to_string()),
                Err(e) => self.invalid(&e),
            }
        }
    }

    /// Prompt every field in order
    fn form(&mut self, fields: &[FormField]) -> Result<FormValues, PromptError> {
        let mut values = FormValues::default();
        for field in fields {
            let raw = self.text(field.label, field.default.as_deref(), &field.validator)?;
            values.insert(field.key, field.kind.to_value(&raw));
        }
        Ok(values)
    }
}

/// Terminal prompts backed by `dialoguer`
pub struct DialoguerPrompts {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompts {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl DialoguerPrompts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptGateway for DialoguerPrompts {
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, PromptError> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default.min(items.len().saturating_sub(1)))
            .interact_opt()?;
        Ok(choice)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    fn read_line(&mut self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string()).show_default(true);
        }
        Ok(input.interact_text()?)
    }

    fn invalid(&mut self, error: &ValidationError) {
        print_warning(&error.message);
    }
}

// ============================================================================
// Validators
// ============================================================================

/// Reject blank input
pub fn non_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("Value cannot be empty"))
    } else {
        Ok(())
    }
}

/// Names and ids: letters, digits, `-` and `_`, at most 64 characters
pub fn identifier(value: &str) -> Result<(), ValidationError> {
    non_empty(value)?;
    if value.chars().count() > 64 {
        return Err(ValidationError::new("Use at most 64 characters"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new(
            "Use only letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

/// A number strictly greater than zero
pub fn positive_number(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        Ok(_) => Err(ValidationError::new("Value must be greater than zero")),
        Err(_) => Err(ValidationError::new("Enter a numeric value")),
    }
}

/// A fraction between 0.0 and 1.0 inclusive
pub fn fraction(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Ok(()),
        Ok(_) => Err(ValidationError::new("Value must be between 0.0 and 1.0")),
        Err(_) => Err(ValidationError::new("Enter a numeric value")),
    }
}
