//! Utility module - terminal styling, spinners and logging setup

pub mod logging;
pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
