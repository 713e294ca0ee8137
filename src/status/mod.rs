// src/status/mod.rs
//! Composite status reporting
//!
//! Merges the supervisor's session snapshot with a fresh resource snapshot
//! into the single payload the web layer serves from `GET /api/status`.
//! Pure composition; all failure handling lives in the two inputs.

use crate::miner::{MiningStatus, MiningSupervisor};
use crate::monitor::{ResourceSnapshot, SystemSampler};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// The combined dashboard payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusReport {
    /// Host resource snapshot
    pub system: ResourceSnapshot,
    /// Mining session snapshot
    pub mining: MiningStatus,
}

/// Builds [`StatusReport`]s from the supervisor and a sampler
///
/// The sampler needs `&mut` to refresh, so it lives behind its own lock;
/// the supervisor carries its own internal one.
pub struct StatusAggregator {
    supervisor: Arc<MiningSupervisor>,
    sampler: Mutex<SystemSampler>,
}

impl StatusAggregator {
    /// Creates an aggregator over a shared supervisor
    pub fn new(supervisor: Arc<MiningSupervisor>) -> Self {
        StatusAggregator {
            supervisor,
            sampler: Mutex::new(SystemSampler::new()),
        }
    }

    /// Produces one composite status payload
    ///
    /// Triggers the supervisor's non-blocking output read as a side effect,
    /// exactly as a web status request should.
    pub fn aggregate(&self) -> StatusReport {
        let mining = self.supervisor.status();
        let system = self
            .sampler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot();
        StatusReport { system, mining }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::miner::MinerCommand;

    #[test]
    fn aggregate_composes_both_inputs() {
        let supervisor = Arc::new(MiningSupervisor::new(
            MinerCommand::FixedPath("/no/such/miner".into()),
            &Config::default(),
        ));
        let aggregator = StatusAggregator::new(supervisor);

        let report = aggregator.aggregate();
        assert!(!report.mining.is_mining);
        assert_eq!(report.mining.coin, "DOGE");
        assert!(report.system.uptime > 0);
    }

    #[test]
    fn report_serializes_with_expected_keys() {
        let supervisor = Arc::new(MiningSupervisor::new(
            MinerCommand::FixedPath("/no/such/miner".into()),
            &Config::default(),
        ));
        let aggregator = StatusAggregator::new(supervisor);

        let json = serde_json::to_value(aggregator.aggregate()).unwrap();
        assert!(json["system"]["cpu_usage"].is_number());
        assert!(json["system"]["memory_usage"].is_number());
        assert!(json["system"]["temperature"].is_number());
        assert!(json["system"]["uptime"].is_number());
        assert_eq!(json["mining"]["is_mining"], false);
        assert!(json["mining"]["start_time"].is_null());
        assert_eq!(json["mining"]["shares_found"], 0);
    }
}
