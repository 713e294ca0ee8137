// src/monitor/sampler.rs
use serde::Serialize;
use sysinfo::{Components, System};

/// Point-in-time view of host resources
///
/// Ephemeral: recomputed on every read, never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceSnapshot {
    /// Mean CPU utilization across all cores, percent
    pub cpu_usage: f32,
    /// Memory utilization, percent of total
    pub memory_usage: f32,
    /// CPU temperature in Celsius, or `0.0` when no sensor is readable
    pub temperature: f32,
    /// Seconds since boot
    pub uptime: u64,
}

/// Samples host resources through `sysinfo`
///
/// Holds the refreshable system handles; callers share it behind a lock
/// since refreshing needs `&mut`.
pub struct SystemSampler {
    system: System,
    components: Components,
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSampler {
    /// Creates a sampler with freshly enumerated system handles
    pub fn new() -> Self {
        SystemSampler {
            system: System::new_all(),
            components: Components::new_with_refreshed_list(),
        }
    }

    /// Takes a fresh resource snapshot
    ///
    /// Never fails: sensor access problems degrade to the temperature
    /// sentinel rather than surfacing an error.
    pub fn snapshot(&mut self) -> ResourceSnapshot {
        self.system.refresh_cpu_all();
        self.system.refresh_memory();
        self.components.refresh(true);

        let cpu_count = self.system.cpus().len().max(1);
        let cpu_usage = self
            .system
            .cpus()
            .iter()
            .map(|c| c.cpu_usage())
            .sum::<f32>()
            / cpu_count as f32;

        let total = self.system.total_memory();
        let memory_usage = if total == 0 {
            0.0
        } else {
            self.system.used_memory() as f32 / total as f32 * 100.0
        };

        let temperature = self
            .components
            .iter()
            .find(|c| c.label().to_lowercase().contains("cpu"))
            .and_then(|c| c.temperature())
            .unwrap_or(0.0);

        ResourceSnapshot {
            cpu_usage,
            memory_usage,
            temperature,
            uptime: System::uptime(),
        }
    }
}
