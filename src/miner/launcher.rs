// src/miner/launcher.rs
//! Launch command construction and per-platform executable lookup
//!
//! The lookup strategy is decided once at startup (or taken from the config
//! override) and injected into the supervisor; only the existence check runs
//! on every start, since the deployment may change underneath us.

use crate::types::{MINING_ALGORITHM, POOL_PASSWORD};
use crate::utils::error::MinerError;
use std::env;
use std::path::PathBuf;

/// Relative location of the bundled Windows miner build
const WINDOWS_MINER_PATH: &str = "miners/cpuminer-multi/cpuminer-gw64-core2.exe";

/// Bare command name resolved against PATH on Unix-like systems
const UNIX_MINER_NAME: &str = "cpuminer";

/// How the miner executable is located on this host
#[derive(Debug, Clone, PartialEq)]
pub enum MinerCommand {
    /// A fixed filesystem path that must exist (Windows bundled build, or a
    /// config override on any platform)
    FixedPath(PathBuf),
    /// A bare command name resolved against the PATH environment variable
    SearchPath(String),
}

impl MinerCommand {
    /// Picks the lookup strategy for a platform identifier as reported by
    /// `std::env::consts::OS` ("windows", "linux", "macos", ...)
    pub fn for_platform(os: &str) -> Self {
        match os {
            "windows" => MinerCommand::FixedPath(PathBuf::from(WINDOWS_MINER_PATH)),
            _ => MinerCommand::SearchPath(UNIX_MINER_NAME.into()),
        }
    }

    /// Picks the lookup strategy for the running host
    pub fn for_host() -> Self {
        Self::for_platform(env::consts::OS)
    }

    /// Resolves the executable, verifying it can actually be found
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path to a present executable
    /// * `Err(MinerError::ExecutableNotFoundError)` - Nothing at the expected
    ///   location, or no PATH entry carries the command
    pub fn locate(&self) -> Result<PathBuf, MinerError> {
        match self {
            MinerCommand::FixedPath(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(MinerError::ExecutableNotFoundError(path.clone()))
                }
            }
            MinerCommand::SearchPath(name) => search_path(name)
                .ok_or_else(|| MinerError::ExecutableNotFoundError(PathBuf::from(name))),
        }
    }
}

/// Walks the PATH environment variable looking for `name`
fn search_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Builds the miner argument vector
///
/// The shape is a wire contract with cpuminer-multi and must stay exactly:
/// `-a scrypt -o <pool> -u <wallet> -p x --threads=<N>`
pub fn build_args(pool: &str, wallet: &str, threads: usize) -> Vec<String> {
    vec![
        "-a".into(),
        MINING_ALGORITHM.into(),
        "-o".into(),
        pool.into(),
        "-u".into(),
        wallet.into(),
        "-p".into(),
        POOL_PASSWORD.into(),
        format!("--threads={}", threads),
    ]
}

impl std::fmt::Display for MinerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinerCommand::FixedPath(path) => write!(f, "{}", path.display()),
            MinerCommand::SearchPath(name) => write!(f, "{} (via PATH)", name),
        }
    }
}
