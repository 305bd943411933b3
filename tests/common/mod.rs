//! Shared test doubles: scripted prompts, a recording surface, and a fake
//! bridge with per-command responses

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde_json::Value;

use hivectl::bridge::{BridgeClient, CommandEnvelope, Data, ResultEnvelope, TransportError};
use hivectl::cli::prompts::{PromptError, PromptGateway, ValidationError};
use hivectl::cli::surface::{Level, Surface, View};

// ============================================================================
// Prompts
// ============================================================================

/// One queued operator answer
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Menu or choice selection; `None` is Esc
    Select(Option<usize>),
    Confirm(bool),
    Line(String),
}

pub fn pick(index: usize) -> Answer {
    Answer::Select(Some(index))
}

pub fn escape() -> Answer {
    Answer::Select(None)
}

pub fn yes() -> Answer {
    Answer::Confirm(true)
}

pub fn no() -> Answer {
    Answer::Confirm(false)
}

pub fn line(text: &str) -> Answer {
    Answer::Line(text.to_string())
}

/// Prompt gateway fed from a queue of answers.
///
/// Running out of answers reports [`PromptError::Closed`], which ends a menu
/// run the same way a closed terminal would.
#[derive(Debug, Default)]
pub struct ScriptedPrompts {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub rejected: Vec<String>,
}

impl ScriptedPrompts {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer, PromptError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or(PromptError::Closed)
    }
}

impl PromptGateway for ScriptedPrompts {
    fn select(
        &mut self,
        prompt: &str,
        _items: &[String],
        _default: usize,
    ) -> Result<Option<usize>, PromptError> {
        match self.next(prompt)? {
            Answer::Select(choice) => Ok(choice),
            other => panic!("expected a selection for '{}', script has {:?}", prompt, other),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, PromptError> {
        match self.next(prompt)? {
            Answer::Confirm(answer) => Ok(answer),
            other => panic!("expected a confirmation for '{}', script has {:?}", prompt, other),
        }
    }

    fn read_line(&mut self, prompt: &str, _default: Option<&str>) -> Result<String, PromptError> {
        match self.next(prompt)? {
            Answer::Line(text) => Ok(text),
            other => panic!("expected text for '{}', script has {:?}", prompt, other),
        }
    }

    fn invalid(&mut self, error: &ValidationError) {
        self.rejected.push(error.message.clone());
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Surface that keeps every view it is handed
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub views: Vec<View>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Breadcrumb paths of every rendered menu, in order
    pub fn menu_paths(&self) -> Vec<String> {
        self.views
            .iter()
            .filter_map(|view| match view {
                View::Menu { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self, wanted: Level) -> Vec<String> {
        self.views
            .iter()
            .filter_map(|view| match view {
                View::Notice { level, message } if *level == wanted => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.notices(Level::Failure)
    }
}

impl Surface for RecordingSurface {
    fn render(&mut self, view: View) {
        self.views.push(view);
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Scripted reply for one command
#[derive(Debug, Clone)]
pub enum Reply {
    Envelope(ResultEnvelope),
    /// Transport failure: the backend timed out
    Unreachable,
}

impl Reply {
    fn into_result(self) -> Result<ResultEnvelope, TransportError> {
        match self {
            Reply::Envelope(envelope) => Ok(envelope),
            Reply::Unreachable => Err(TransportError::Timeout(Duration::from_secs(30))),
        }
    }
}

/// Bridge double with per-command replies and a call log.
///
/// Queued replies are used first, then the command's standing reply.
/// Unknown commands fail as a domain error.
#[derive(Debug, Default)]
pub struct FakeBridge {
    standing: RefCell<HashMap<String, Reply>>,
    queued: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<CommandEnvelope>>,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `command` with a success carrying `data`
    pub fn succeed(self, command: &str, data: Value) -> Self {
        self.standing
            .borrow_mut()
            .insert(command.to_string(), Reply::Envelope(success(data)));
        self
    }

    /// Always answer `command` with a domain failure
    pub fn reject(self, command: &str, error: &str) -> Self {
        self.standing.borrow_mut().insert(
            command.to_string(),
            Reply::Envelope(ResultEnvelope::failure(error)),
        );
        self
    }

    /// Always fail `command` at the transport level
    pub fn unreachable(self, command: &str) -> Self {
        self.standing
            .borrow_mut()
            .insert(command.to_string(), Reply::Unreachable);
        self
    }

    /// Use `reply` for the next call of `command` only
    pub fn then(self, command: &str, reply: Reply) -> Self {
        self.queued
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<CommandEnvelope> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Command names in call order
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|envelope| envelope.command().to_string())
            .collect()
    }

    /// Arguments of the `n`th call as JSON
    pub fn args_of(&self, n: usize) -> Value {
        serde_json::to_value(self.calls.borrow()[n].args()).unwrap()
    }
}

impl BridgeClient for FakeBridge {
    fn send(&self, envelope: &CommandEnvelope) -> Result<ResultEnvelope, TransportError> {
        self.calls.borrow_mut().push(envelope.clone());
        let command = envelope.command();

        let queued = self
            .queued
            .borrow_mut()
            .get_mut(command)
            .and_then(VecDeque::pop_front);
        let reply = queued.or_else(|| self.standing.borrow().get(command).cloned());
        match reply {
            Some(reply) => reply.into_result(),
            None => Ok(ResultEnvelope::failure(format!("unknown command {}", command))),
        }
    }
}

/// Success envelope from a JSON object literal
pub fn success(data: Value) -> ResultEnvelope {
    ResultEnvelope::success(object(data))
}

pub fn object(value: Value) -> Data {
    value.as_object().cloned().expect("test data must be a JSON object")
}
