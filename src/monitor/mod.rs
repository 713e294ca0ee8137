// src/monitor/mod.rs
//! Host resource monitoring
//!
//! Stateless sampling of CPU, memory, temperature and uptime for the
//! dashboard. A snapshot is recomputed on every read and never fails; a
//! missing thermal sensor degrades to a sentinel value.

/// Resource sampling implementation
pub mod sampler;

pub use sampler::{ResourceSnapshot, SystemSampler};
