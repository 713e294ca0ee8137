// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Doge Dash CLI - supervisor for a local Dogecoin (scrypt) miner
#[derive(Parser, Debug)]
#[command(name = "doge-dash-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (run the miner, print status, or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the dashboard application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Start the miner and log combined status until it exits
    Run(RunOptions),

    /// Print one combined system/mining status report as JSON
    Status(StatusOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for running the miner under supervision
#[derive(Parser, Debug)]
pub struct RunOptions {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Pool connection string (overrides config)
    #[arg(short, long)]
    pub pool: Option<String>,

    /// Wallet address to mine to (overrides config)
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Number of miner threads (overrides config)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Stop the miner after this many seconds (runs until exit if unset)
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// Options for the one-shot status report
#[derive(Parser, Debug)]
pub struct StatusOptions {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}
