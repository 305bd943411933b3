//! Render surface
//!
//! Menus and wizards hand owned [`View`] values to a [`Surface`]; they never
//! print directly. The terminal implementation draws them with `console`
//! and `comfy-table`.

use crate::bridge::Data;
use crate::report::{print_detail, print_records, VoteTally};
use crate::utils::{print_failure, print_info, print_menu_header, print_success, print_warning};

/// Severity of an operator notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Failure,
}

/// Something to show the operator
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Menu header: the breadcrumb path and the menu title
    Menu { path: String, title: String },
    /// A list of records
    Table { title: String, rows: Vec<Data> },
    /// A single record
    Detail { title: String, data: Data },
    /// A voting session
    Consensus { title: String, tally: VoteTally },
    /// A one-line message
    Notice { level: Level, message: String },
}

impl View {
    pub fn success(message: impl Into<String>) -> Self {
        View::Notice {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        View::Notice {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        View::Notice {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        View::Notice {
            level: Level::Failure,
            message: message.into(),
        }
    }
}

/// Output side of the console
pub trait Surface {
    fn render(&mut self, view: View);
}

/// Draws views on stdout
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for TerminalSurface {
    fn render(&mut self, view: View) {
        match view {
            View::Menu { path, title } => print_menu_header(&path, &title),
            View::Table { title, rows } => print_records(&title, &rows),
            View::Detail { title, data } => print_detail(&title, &data),
            View::Consensus { title, tally } => tally.display(&title),
            View::Notice { level, message } => match level {
                Level::Success => print_success(&message),
                Level::Info => print_info(&message),
                Level::Warning => print_warning(&message),
                Level::Failure => print_failure(&message),
            },
        }
    }
}
