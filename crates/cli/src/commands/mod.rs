//! CLI command implementations.

pub mod backend;
pub mod catalog;
pub mod state;
