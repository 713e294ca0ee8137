// src/miner/mod.rs
//! Miner subprocess management
//!
//! This module contains everything concerning the external miner process:
//! - Launch command construction and per-platform executable lookup
//! - Parsing of the miner's line-oriented log output
//! - The supervisor owning the process handle and session state

/// Launch command construction and executable resolution
pub mod launcher;

/// Log-line parsing for shares and hashrate
pub mod parser;

/// Process supervision and session state
pub mod supervisor;

// Re-export main components for cleaner imports
pub use self::launcher::MinerCommand;
pub use self::parser::StatusDelta;
pub use self::supervisor::{MiningStatus, MiningSupervisor};
