// src/cli/mod.rs
//! Command-line interface for the dashboard core

/// Command and option definitions
pub mod commands;

pub use commands::{Action, Commands};
