//! hivectl: operator console for a hive of trading agents
//!
//! Breadcrumb menus and multi-step wizards on top of a synchronous bridge to
//! the compute backend.

pub mod bridge;
pub mod cli;
pub mod report;
pub mod utils;
