//! Operator session: the collaborators one menu or wizard run works with

use crate::bridge::{BridgeClient, CallError, CommandArgs, Data};
use crate::report::DEFAULT_BAR_WIDTH;

use super::prompts::PromptGateway;
use super::surface::{Surface, View};

/// Bridge, prompts and render surface for one operator session.
///
/// There is a single flow of control: every bridge call blocks the session
/// until it returns.
pub struct Session<'a> {
    pub bridge: &'a dyn BridgeClient,
    pub prompts: &'a mut dyn PromptGateway,
    pub surface: &'a mut dyn Surface,
    pub bar_width: usize,
}

impl<'a> Session<'a> {
    pub fn new(
        bridge: &'a dyn BridgeClient,
        prompts: &'a mut dyn PromptGateway,
        surface: &'a mut dyn Surface,
    ) -> Self {
        Self {
            bridge,
            prompts,
            surface,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Send one command and gate on `success`
    pub fn call(&self, command: &str, args: CommandArgs) -> Result<Data, CallError> {
        self.bridge.call(command, args)
    }

    pub fn show(&mut self, view: View) {
        self.surface.render(view);
    }
}
