// src/utils/mod.rs
//! Utility functions and shared infrastructure
//!
//! Contains error types and logging setup used across the crate.

/// Error types for supervisor, configuration and I/O failures
pub mod error;

/// Logging configuration
pub mod logging;

pub use error::MinerError;
pub use logging::init_logging;
