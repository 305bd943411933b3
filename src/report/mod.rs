//! Report module - rendering backend data and consensus tallies

pub mod tables;
pub mod vote_bar;

pub use tables::*;
pub use vote_bar::*;
