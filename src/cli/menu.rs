//! Menu controller
//!
//! The console's menus run as an explicit state machine instead of nested
//! loops:
//!
//! ```text
//! Render -> Prompt -> Dispatch -> Render (leaf action, same menu)
//!                              -> Render (submenu, trail pushed)
//!                              -> Render (back, parent menu) | Exit (at root)
//! ```
//!
//! Each [`Frame`] owns its breadcrumb trail and the chain of parent menus, so
//! every state is a plain value that can be inspected in tests.

use std::collections::VecDeque;

use super::actions::{catch_at_leaf, Action};
use super::navigation::{Breadcrumb, ROOT_LABEL};
use super::prompts::PromptError;
use super::session::Session;
use super::surface::View;

/// Number of states kept in the controller's history
const HISTORY_LIMIT: usize = 512;

/// Every menu in the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Root,
    Agents,
    Swarms,
    Wallets,
    Metrics,
}

impl MenuId {
    /// Label pushed onto the breadcrumb trail when the menu is entered
    pub fn label(self) -> &'static str {
        match self {
            MenuId::Root => ROOT_LABEL,
            MenuId::Agents => "Agents",
            MenuId::Swarms => "Swarms",
            MenuId::Wallets => "Wallets",
            MenuId::Metrics => "Metrics",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuId::Root => "Main menu",
            MenuId::Agents => "Agent management",
            MenuId::Swarms => "Swarm coordination",
            MenuId::Wallets => "Wallets and trading",
            MenuId::Metrics => "Metrics",
        }
    }

    pub fn entries(self) -> &'static [MenuEntry] {
        use MenuEntry::{Action as Run, Back, Submenu};
        match self {
            MenuId::Root => &[
                Submenu(MenuId::Agents),
                Submenu(MenuId::Swarms),
                Submenu(MenuId::Wallets),
                Submenu(MenuId::Metrics),
                Run(Action::BackendHealth),
                Back,
            ],
            MenuId::Agents => &[
                Run(Action::ListAgents),
                Run(Action::InspectAgent),
                Run(Action::TrainSkill),
                Run(Action::OnboardAgent),
                Back,
            ],
            MenuId::Swarms => &[
                Run(Action::ListSwarms),
                Run(Action::CreateSwarm),
                Run(Action::ViewConsensus),
                Run(Action::CastVote),
                Back,
            ],
            MenuId::Wallets => &[
                Run(Action::ListWallets),
                Run(Action::WalletBalance),
                Run(Action::CreateWallet),
                Run(Action::ExecuteTrade),
                Back,
            ],
            MenuId::Metrics => &[
                Run(Action::SystemMetrics),
                Run(Action::AgentMetrics),
                Back,
            ],
        }
    }
}

/// One selectable line of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Submenu(MenuId),
    Action(Action),
    /// "Back" in a submenu, "Exit" at the root
    Back,
}

impl MenuEntry {
    pub fn label(self, at_root: bool) -> String {
        match self {
            MenuEntry::Submenu(menu) => format!("{} ▸", menu.label()),
            MenuEntry::Action(action) => action.label().to_string(),
            MenuEntry::Back if at_root => "Exit".to_string(),
            MenuEntry::Back => "Back".to_string(),
        }
    }
}

/// An active menu invocation: which menu, the trail that leads to it, and
/// the menus to return to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    menu: MenuId,
    trail: Breadcrumb,
    parents: Vec<MenuId>,
}

impl Frame {
    pub fn root() -> Self {
        Self {
            menu: MenuId::Root,
            trail: Breadcrumb::root(),
            parents: Vec::new(),
        }
    }

    pub fn menu(&self) -> MenuId {
        self.menu
    }

    pub fn trail(&self) -> &Breadcrumb {
        &self.trail
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Frame for a submenu opened from this one
    pub fn enter(&self, menu: MenuId) -> Frame {
        let mut parents = self.parents.clone();
        parents.push(self.menu);
        Frame {
            menu,
            trail: self.trail.push(menu.label()),
            parents,
        }
    }

    /// Frame of the parent menu, or `None` at the root
    pub fn leave(&self) -> Option<Frame> {
        let mut parents = self.parents.clone();
        let menu = parents.pop()?;
        Some(Frame {
            menu,
            trail: self.trail.pop(),
            parents,
        })
    }

    fn item_labels(&self) -> Vec<String> {
        let at_root = self.is_root();
        self.menu
            .entries()
            .iter()
            .map(|entry| entry.label(at_root))
            .collect()
    }
}

/// Menu controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Render(Frame),
    Prompt(Frame),
    Dispatch(Frame, MenuEntry),
    Exit,
}

impl MenuState {
    pub fn initial() -> Self {
        MenuState::Render(Frame::root())
    }

    /// Frame of the active menu, if any
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            MenuState::Render(frame) | MenuState::Prompt(frame) | MenuState::Dispatch(frame, _) => {
                Some(frame)
            }
            MenuState::Exit => None,
        }
    }
}

/// Drives the menu state machine until the operator exits at the root
#[derive(Debug, Default)]
pub struct MenuController {
    history: VecDeque<MenuState>,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    /// States visited so far, oldest first (bounded)
    pub fn history(&self) -> &VecDeque<MenuState> {
        &self.history
    }

    /// Run from the root menu until Exit
    pub fn run(&mut self, session: &mut Session<'_>) -> Result<(), PromptError> {
        let mut state = MenuState::initial();
        loop {
            self.record(&state);
            if state == MenuState::Exit {
                return Ok(());
            }
            state = self.transition(state, session)?;
        }
    }

    /// Advance one state
    pub fn transition(
        &mut self,
        state: MenuState,
        session: &mut Session<'_>,
    ) -> Result<MenuState, PromptError> {
        let next = match state {
            MenuState::Render(frame) => {
                session.show(View::Menu {
                    path: frame.trail().path(),
                    title: frame.menu().title().to_string(),
                });
                MenuState::Prompt(frame)
            }
            MenuState::Prompt(frame) => {
                let items = frame.item_labels();
                match session.prompts.select(frame.menu().title(), &items, 0)? {
                    Some(index) => match frame.menu().entries().get(index) {
                        Some(entry) => MenuState::Dispatch(frame, *entry),
                        None => MenuState::Render(frame),
                    },
                    // Esc leaves a submenu but never quits the console
                    None if frame.is_root() => MenuState::Render(frame),
                    None => MenuState::Dispatch(frame, MenuEntry::Back),
                }
            }
            MenuState::Dispatch(frame, entry) => {
                tracing::debug!(path = %frame.trail(), entry = ?entry, "menu dispatch");
                match entry {
                    MenuEntry::Submenu(menu) => MenuState::Render(frame.enter(menu)),
                    MenuEntry::Action(action) => {
                        catch_at_leaf(|s: &mut Session<'_>| action.run(s))(session)?;
                        MenuState::Render(frame)
                    }
                    MenuEntry::Back => match frame.leave() {
                        Some(parent) => MenuState::Render(parent),
                        None => MenuState::Exit,
                    },
                }
            }
            MenuState::Exit => MenuState::Exit,
        };
        Ok(next)
    }

    fn record(&mut self, state: &MenuState) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_newest_states_up_to_limit() {
        let mut controller = MenuController::new();
        controller.record(&MenuState::Exit);
        for _ in 0..HISTORY_LIMIT {
            controller.record(&MenuState::initial());
        }
        controller.record(&MenuState::Prompt(Frame::root()));

        let history = controller.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(
            !history.contains(&MenuState::Exit),
            "oldest state should be dropped first"
        );
        assert_eq!(history.back(), Some(&MenuState::Prompt(Frame::root())));
    }

    #[test]
    fn test_every_menu_ends_with_back() {
        for menu in [
            MenuId::Root,
            MenuId::Agents,
            MenuId::Swarms,
            MenuId::Wallets,
            MenuId::Metrics,
        ] {
            assert_eq!(menu.entries().last(), Some(&MenuEntry::Back), "{:?}", menu);
        }
    }

    #[test]
    fn test_back_label_depends_on_depth() {
        assert_eq!(MenuEntry::Back.label(true), "Exit");
        assert_eq!(MenuEntry::Back.label(false), "Back");
        assert_eq!(MenuEntry::Submenu(MenuId::Swarms).label(true), "Swarms ▸");
    }

    #[test]
    fn test_enter_then_leave_restores_frame() {
        let root = Frame::root();
        let wallets = root.enter(MenuId::Wallets);
        assert_eq!(wallets.trail().path(), "Hive › Wallets");
        assert!(!wallets.is_root());
        assert_eq!(wallets.leave(), Some(root.clone()));
        assert_eq!(root.leave(), None);
    }
}
