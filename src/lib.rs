//! Doge Dash - web-controllable supervisor for a local Dogecoin miner
//!
//! This crate provides the process-management core behind a mining dashboard:
//! - Supervision of an external `cpuminer` (scrypt) subprocess
//! - Non-blocking parsing of the miner's log stream for shares and hashrate
//! - Host resource sampling (CPU, memory, temperature, uptime)
//! - Aggregation of both into a single status payload for a web front end

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner subprocess supervision, launch command construction and log parsing
pub mod miner;

/// Host resource sampling
pub mod monitor;

/// Composite status reporting for the web layer
pub mod status;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{MinerCommand, MiningStatus, MiningSupervisor, StatusDelta};
pub use monitor::{ResourceSnapshot, SystemSampler};
pub use status::{StatusAggregator, StatusReport};
pub use types::ApiResponse;
pub use utils::{MinerError, init_logging};
