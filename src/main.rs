// src/main.rs
use clap::Parser;
use doge_dash_rs::cli::commands::{ConfigOptions, RunOptions, StatusOptions};
use doge_dash_rs::{
    MinerError, MiningSupervisor, StatusAggregator, cli, config, utils,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main entry point for the dashboard core
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to appropriate subcommand handler
/// 3. Propagates any errors upward
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Run(opts) => run_miner(opts),
        cli::Action::Status(opts) => print_status(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Starts the miner and logs combined status at the monitoring interval
///
/// The loop ends when the requested duration elapses or the miner exits on
/// its own; either way the supervisor is left stopped.
fn run_miner(opts: RunOptions) -> Result<(), MinerError> {
    utils::init_logging();

    let config = load_or_default(&opts.config);
    let interval = Duration::from_secs(config.monitor_interval_secs.max(1));
    let temperature_warning = config.temperature_warning;

    let supervisor = Arc::new(MiningSupervisor::from_config(&config));
    let aggregator = StatusAggregator::new(supervisor.clone());

    supervisor.start(
        opts.pool.as_deref(),
        opts.wallet.as_deref(),
        opts.threads,
    )?;

    let started = Instant::now();
    loop {
        std::thread::sleep(interval);

        let report = aggregator.aggregate();
        log::info!(
            "Hashrate: {:.2} MH/s | Shares: {} | CPU: {:.1}% | Mem: {:.1}% | Temp: {:.1}°C",
            report.mining.hashrate,
            report.mining.shares_found,
            report.system.cpu_usage,
            report.system.memory_usage,
            report.system.temperature
        );
        if report.system.temperature > temperature_warning {
            log::warn!(
                "CPU temperature {:.1}°C exceeds warning threshold {:.1}°C",
                report.system.temperature,
                temperature_warning
            );
        }

        if !report.mining.is_mining {
            log::info!("Miner exited; shutting down");
            return Ok(());
        }
        if let Some(secs) = opts.duration {
            if started.elapsed() >= Duration::from_secs(secs) {
                supervisor.stop()?;
                return Ok(());
            }
        }
    }
}

/// Prints one combined status report as pretty JSON
fn print_status(opts: StatusOptions) -> Result<(), MinerError> {
    let config = load_or_default(&opts.config);
    let supervisor = Arc::new(MiningSupervisor::from_config(&config));
    let aggregator = StatusAggregator::new(supervisor);

    let report = aggregator.aggregate();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Generates configuration template file
fn generate_config(opts: ConfigOptions) -> Result<(), MinerError> {
    let template = config::generate_template();
    std::fs::write(opts.output, template)?;
    Ok(())
}

/// Loads the config file, falling back to built-in defaults when it is
/// absent so the CLI works out of the box
fn load_or_default(path: &std::path::Path) -> config::Config {
    match config::load(path) {
        Ok(config) => config,
        Err(e) => {
            log::debug!("Using default configuration: {}", e);
            config::Config::default()
        }
    }
}
