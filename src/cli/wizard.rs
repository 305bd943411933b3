//! Multi-step wizard engine
//!
//! A wizard is a linear sequence of dependent steps. Each step gets the
//! artifacts of every step before it, makes its bridge calls, and either
//! produces the next artifact or aborts the whole run.
//!
//! # Flow
//!
//! 1. Confirm-start (declining is a no-op: no steps run, no calls are made)
//! 2. Mandatory steps, in order
//! 3. Optional tail action, only if the operator opts in
//! 4. Complete
//!
//! Any step failure moves straight to `Abort`. Completed steps are not rolled
//! back: each one created a backend resource that stands on its own, so the
//! abort report lists them as already committed.

use serde_json::Value;
use thiserror::Error;

use crate::bridge::CallError;

use super::prompts::PromptError;
use super::session::Session;
use super::surface::View;

// ============================================================================
// Artifacts and Step Results
// ============================================================================

/// Value produced by a step and handed to every later step
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    step: String,
    value: Value,
}

impl Artifact {
    pub fn new(step: impl Into<String>, value: Value) -> Self {
        Self {
            step: step.into(),
            value,
        }
    }

    /// Name of the step that produced this artifact
    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The `id` field, when the artifact is a record that has one
    pub fn id(&self) -> Option<&str> {
        self.value.get("id").and_then(Value::as_str)
    }
}

/// Why a step could not produce its artifact
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("cancelled by operator")]
    Cancelled,

    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Why a wizard run stopped early
#[derive(Debug, Error)]
pub enum AbortReason {
    #[error(transparent)]
    Call(CallError),

    #[error("cancelled by operator")]
    Cancelled,

    #[error("{0}")]
    Precondition(String),

    #[error("step produced no result")]
    EmptyArtifact,
}

impl AbortReason {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AbortReason::Cancelled)
    }
}

type StepFn = dyn Fn(&mut Session<'_>, &[Artifact]) -> Result<Value, StepFailure>;

/// One named wizard step
pub struct Step {
    name: String,
    run: Box<StepFn>,
}

impl Step {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut Session<'_>, &[Artifact]) -> Result<Value, StepFailure> + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

struct TailAction {
    prompt: String,
    step: Step,
}

// ============================================================================
// State Machine
// ============================================================================

/// Position of a wizard run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    ConfirmStart,
    Step(usize),
    OfferTail,
    Tail,
    Complete,
    Abort,
}

/// Terminal result of a wizard run
#[derive(Debug)]
pub enum WizardOutcome {
    /// Operator declined the start confirmation; nothing ran
    Declined,
    /// All mandatory steps succeeded
    Completed {
        artifacts: Vec<Artifact>,
        tail_ran: bool,
    },
    /// A step failed or was cancelled; `artifacts` are from the steps that
    /// had already completed
    Aborted {
        step: String,
        reason: AbortReason,
        artifacts: Vec<Artifact>,
    },
}

/// A linear, abortable sequence of dependent steps
pub struct Wizard {
    title: String,
    steps: Vec<Step>,
    tail: Option<TailAction>,
}

impl Wizard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
            tail: None,
        }
    }

    /// Append a mandatory step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the optional action offered after every mandatory step succeeded
    pub fn tail(mut self, prompt: impl Into<String>, step: Step) -> Self {
        self.tail = Some(TailAction {
            prompt: prompt.into(),
            step,
        });
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// Run the wizard to a terminal state
    pub fn run(&self, session: &mut Session<'_>) -> Result<WizardOutcome, PromptError> {
        self.run_traced(session).map(|(outcome, _)| outcome)
    }

    /// Run the wizard and also return every phase it passed through
    pub fn run_traced(
        &self,
        session: &mut Session<'_>,
    ) -> Result<(WizardOutcome, Vec<WizardPhase>), PromptError> {
        let mut phase = WizardPhase::ConfirmStart;
        let mut trace = vec![phase];
        let mut artifacts: Vec<Artifact> = Vec::new();
        let mut tail_ran = false;

        loop {
            phase = match phase {
                WizardPhase::ConfirmStart => {
                    let prompt = format!("Start {}?", self.title.to_lowercase());
                    if !session.prompts.confirm(&prompt, true)? {
                        tracing::info!(wizard = %self.title, "wizard declined");
                        return Ok((WizardOutcome::Declined, trace));
                    }
                    self.after_mandatory(0)
                }
                WizardPhase::Step(index) => {
                    let step = &self.steps[index];
                    match self.execute(step, session, &artifacts)? {
                        Ok(artifact) => {
                            artifacts.push(artifact);
                            self.after_mandatory(index + 1)
                        }
                        Err(reason) => {
                            trace.push(WizardPhase::Abort);
                            return Ok((self.abort(step, reason, artifacts), trace));
                        }
                    }
                }
                WizardPhase::OfferTail => match &self.tail {
                    Some(tail) if session.prompts.confirm(&tail.prompt, false)? => {
                        WizardPhase::Tail
                    }
                    _ => WizardPhase::Complete,
                },
                WizardPhase::Tail => match &self.tail {
                    Some(tail) => match self.execute(&tail.step, session, &artifacts)? {
                        Ok(artifact) => {
                            artifacts.push(artifact);
                            tail_ran = true;
                            WizardPhase::Complete
                        }
                        Err(reason) => {
                            trace.push(WizardPhase::Abort);
                            return Ok((self.abort(&tail.step, reason, artifacts), trace));
                        }
                    },
                    None => WizardPhase::Complete,
                },
                WizardPhase::Complete | WizardPhase::Abort => break,
            };
            trace.push(phase);
        }

        tracing::info!(
            wizard = %self.title,
            steps = artifacts.len(),
            tail_ran,
            "wizard complete"
        );
        Ok((
            WizardOutcome::Completed {
                artifacts,
                tail_ran,
            },
            trace,
        ))
    }

    /// Phase that follows once `done` mandatory steps have succeeded
    fn after_mandatory(&self, done: usize) -> WizardPhase {
        if done < self.steps.len() {
            WizardPhase::Step(done)
        } else if self.tail.is_some() {
            WizardPhase::OfferTail
        } else {
            WizardPhase::Complete
        }
    }

    /// Run one step. The outer error is a prompt failure that ends the
    /// session; the inner one aborts only this run.
    fn execute(
        &self,
        step: &Step,
        session: &mut Session<'_>,
        prior: &[Artifact],
    ) -> Result<Result<Artifact, AbortReason>, PromptError> {
        tracing::debug!(
            wizard = %self.title,
            step = %step.name,
            prior = prior.len(),
            "wizard step start"
        );
        let reason = match (step.run)(session, prior) {
            Ok(Value::Null) => AbortReason::EmptyArtifact,
            Ok(value) => return Ok(Ok(Artifact::new(&step.name, value))),
            Err(StepFailure::Prompt(e)) => return Err(e),
            Err(StepFailure::Call(e)) => AbortReason::Call(e),
            Err(StepFailure::Cancelled) => AbortReason::Cancelled,
            Err(StepFailure::Precondition(msg)) => AbortReason::Precondition(msg),
        };
        Ok(Err(reason))
    }

    fn abort(&self, step: &Step, reason: AbortReason, artifacts: Vec<Artifact>) -> WizardOutcome {
        tracing::warn!(
            wizard = %self.title,
            step = %step.name,
            reason = %reason,
            committed = artifacts.len(),
            "wizard aborted"
        );
        WizardOutcome::Aborted {
            step: step.name.clone(),
            reason,
            artifacts,
        }
    }
}

// ============================================================================
// Outcome Reporting
// ============================================================================

/// Views describing how a wizard run ended
pub fn describe_outcome(title: &str, outcome: &WizardOutcome) -> Vec<View> {
    match outcome {
        WizardOutcome::Declined => {
            vec![View::info(format!("{} not started; nothing was created.", title))]
        }
        WizardOutcome::Completed { artifacts, .. } => {
            let mut views = vec![View::success(format!("{} complete", title))];
            views.extend(artifacts.iter().map(|a| View::info(describe_artifact(a))));
            views
        }
        WizardOutcome::Aborted {
            step,
            reason,
            artifacts,
        } => {
            let mut views = vec![if reason.is_cancellation() {
                View::warning(format!("{} cancelled at '{}'", title, step))
            } else {
                View::failure(format!("{} stopped at '{}': {}", title, step, reason))
            }];
            if !artifacts.is_empty() {
                views.push(View::warning(
                    "Already created on the backend (not rolled back):",
                ));
                views.extend(artifacts.iter().map(|a| View::info(describe_artifact(a))));
            }
            views
        }
    }
}

fn describe_artifact(artifact: &Artifact) -> String {
    match artifact.id() {
        Some(id) => format!("{}: {}", artifact.step(), id),
        None => artifact.step().to_string(),
    }
}

/// Position-based lookup of the `id` a prior step produced
pub fn prior_id<'p>(
    prior: &'p [Artifact],
    index: usize,
    what: &str,
) -> Result<&'p str, StepFailure> {
    prior
        .get(index)
        .and_then(Artifact::id)
        .ok_or_else(|| StepFailure::Precondition(format!("no {} id from an earlier step", what)))
}
