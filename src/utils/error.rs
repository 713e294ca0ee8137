// src/utils/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the mining dashboard core
///
/// This enum represents all failure conditions of the supervisor and its
/// surrounding plumbing. State-conflict variants (`AlreadyRunningError`,
/// `NotRunningError`) are expected outcomes under concurrent callers, not
/// exceptional conditions; the web boundary turns every variant into a
/// structured error response.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Invalid caller input (e.g. missing wallet address)
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// The miner executable could not be located on this host
    #[error("Mining software not found at {}. Please install cpuminer-multi.", .0.display())]
    ExecutableNotFoundError(PathBuf),

    /// A start was requested while a session is already live
    #[error("Mining is already running")]
    AlreadyRunningError,

    /// A stop was requested with no live session
    #[error("Mining is not running")]
    NotRunningError,

    /// The OS refused to create the miner process
    #[error("Failed to start mining: {0}")]
    LaunchError(#[source] io::Error),

    /// Signal delivery to the miner process failed
    #[error("Failed to stop mining: {0}")]
    TerminationError(#[source] io::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors when rendering status payloads
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
