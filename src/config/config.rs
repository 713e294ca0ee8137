// src/config/config.rs
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the mining dashboard
///
/// Contains the defaults handed to the supervisor at construction (pool,
/// wallet, thread count) and the settings of the monitoring loop. Every field
/// has a serde default so a partial or empty file still loads.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Default mining pool connection string, used when a start request
    /// carries no pool of its own
    #[serde(default = "default_pool")]
    pub pool: String,

    /// Default wallet address (may be empty, in which case every start
    /// request must supply one)
    #[serde(default)]
    pub wallet: String,

    /// Number of miner threads passed as `--threads=<N>`
    /// (default: number of CPU cores)
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Seconds between status samples in the monitoring loop
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval_secs: u64,

    /// CPU temperature (Celsius) above which a warning is logged
    #[serde(default = "default_temperature_warning")]
    pub temperature_warning: f32,

    /// Explicit path to the miner executable, overriding the per-platform
    /// lookup when set
    #[serde(default)]
    pub miner_path: Option<PathBuf>,
}

fn default_pool() -> String {
    "stratum+tcp://pool.systm.org:22550".into()
}

fn default_threads() -> usize {
    num_cpus::get()
}

fn default_monitor_interval() -> u64 {
    5
}

fn default_temperature_warning() -> f32 {
    70.0
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool: default_pool(),
            wallet: String::new(),
            threads: default_threads(),
            monitor_interval_secs: default_monitor_interval(),
            temperature_warning: default_temperature_warning(),
            miner_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MinerError)` - If file couldn't be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Doge Dash Configuration\n\n");
        template.push_str("# Default Dogecoin pool (scrypt)\n");
        template.push_str("pool = \"stratum+tcp://pool.systm.org:22550\"\n");
        template.push_str("# Payout wallet address; may be left empty and supplied per request\n");
        template.push_str("wallet = \"\"\n");
        template.push_str("# Miner threads (0 entries omitted fall back to CPU count)\n");
        template.push_str("threads = 2\n\n");
        template.push_str("# Seconds between monitoring samples\n");
        template.push_str("monitor_interval_secs = 5\n");
        template.push_str("# Log a warning above this CPU temperature (Celsius)\n");
        template.push_str("temperature_warning = 70.0\n\n");
        template.push_str("# Uncomment to point at a specific miner binary\n");
        template.push_str("# miner_path = \"/usr/local/bin/cpuminer\"\n");

        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.pool, "stratum+tcp://pool.systm.org:22550");
        assert!(config.wallet.is_empty());
        assert_eq!(config.monitor_interval_secs, 5);
        assert_eq!(config.temperature_warning, 70.0);
        assert!(config.miner_path.is_none());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: Config =
            toml::from_str("wallet = \"D7xyz\"\nthreads = 4\n").unwrap();
        assert_eq!(config.wallet, "D7xyz");
        assert_eq!(config.threads, 4);
        assert_eq!(config.pool, "stratum+tcp://pool.systm.org:22550");
    }

    #[test]
    fn template_is_valid_toml() {
        let template = Config::generate_template();
        let config: Config = toml::from_str(&template).unwrap();
        assert_eq!(config.threads, 2);
    }
}
