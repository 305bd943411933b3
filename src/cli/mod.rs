//! CLI module - argument parsing, configuration, prompts, menus and wizards

pub mod actions;
pub mod args;
pub mod call;
pub mod config;
pub mod menu;
pub mod navigation;
pub mod onboarding;
pub mod prompts;
pub mod session;
pub mod surface;
pub mod wizard;

pub use args::{Cli, Commands};
pub use config::ConsoleConfig;
pub use menu::MenuController;
pub use navigation::Breadcrumb;
pub use prompts::{DialoguerPrompts, PromptError, PromptGateway};
pub use session::Session;
pub use surface::{Surface, TerminalSurface, View};
