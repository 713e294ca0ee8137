// src/miner/supervisor.rs
//! Miner process supervision
//!
//! The supervisor owns at most one live miner subprocess and the session
//! state describing it. All three operations (`start`, `stop`, `status`)
//! serialize on one mutex, so concurrent web requests can never race two
//! children into existence or observe a half-cleared handle.

use crate::config::Config;
use crate::miner::launcher::{self, MinerCommand};
use crate::miner::parser::{self, StatusDelta};
use crate::types::{ApiResponse, MINING_COIN};
use crate::utils::error::MinerError;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::Serialize;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long `stop` polls for the signalled child to exit before detaching
const REAP_WINDOW: Duration = Duration::from_millis(500);
const REAP_POLL: Duration = Duration::from_millis(50);

/// Snapshot of the mining session as rendered to the web layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MiningStatus {
    /// Whether a miner subprocess is currently live
    pub is_mining: bool,
    /// Unix timestamp of the current session's start, if running
    pub start_time: Option<u64>,
    /// Last hashrate estimate parsed from miner output, in MH/s
    pub hashrate: f64,
    /// Shares accepted by the pool during the current session
    pub shares_found: u64,
    /// Pool connection string of the current or last session
    pub pool: String,
    /// Wallet address of the current or last session
    pub wallet: String,
    /// Coin being mined (fixed for this deployment)
    pub coin: String,
}

/// Outcome of one non-blocking read attempt from the miner's output
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// A full line of miner output was available
    Ready(String),
    /// No output is buffered right now; the miner may just be quiet
    NotReady,
    /// Both output streams have closed; the miner has exited or is exiting
    Closed,
}

/// Drains a child's stdout and stderr into a channel from background threads
/// so the supervisor can poll for lines without ever blocking a request
pub struct OutputReader {
    receiver: Receiver<String>,
}

impl OutputReader {
    /// Takes ownership of the child's captured output streams and starts
    /// one reader thread per stream
    pub fn attach(child: &mut Child) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, tx);
        }
        OutputReader { receiver: rx }
    }

    /// Attempts to take one buffered line without blocking
    pub fn try_read(&self) -> ReadOutcome {
        match self.receiver.try_recv() {
            Ok(line) => ReadOutcome::Ready(line),
            Err(TryRecvError::Empty) => ReadOutcome::NotReady,
            Err(TryRecvError::Disconnected) => ReadOutcome::Closed,
        }
    }
}

/// Reader threads exit when the stream closes or the supervisor drops the
/// receiving side
fn spawn_reader(stream: impl Read + Send + 'static, sender: Sender<String>) {
    std::thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

/// Session fields and process handle, guarded together by one mutex
struct SessionInner {
    running: bool,
    started_at: Option<SystemTime>,
    pool: String,
    wallet: String,
    hashrate: f64,
    shares_found: u64,
    child: Option<Child>,
    output: Option<OutputReader>,
}

impl SessionInner {
    fn stopped() -> Self {
        SessionInner {
            running: false,
            started_at: None,
            pool: String::new(),
            wallet: String::new(),
            hashrate: 0.0,
            shares_found: 0,
            child: None,
            output: None,
        }
    }

    /// Forces the session back to the stopped state. Pool and wallet are
    /// kept for display; counters and the timestamp always reset.
    fn reset(&mut self) {
        self.running = false;
        self.started_at = None;
        self.hashrate = 0.0;
        self.shares_found = 0;
        self.child = None;
        self.output = None;
    }

    fn apply(&mut self, delta: StatusDelta) {
        match delta {
            StatusDelta::ShareAccepted => self.shares_found += 1,
            StatusDelta::Hashrate(value) => self.hashrate = value,
        }
    }

    fn view(&self) -> MiningStatus {
        MiningStatus {
            is_mining: self.running,
            start_time: self.started_at.and_then(|t| {
                t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
            }),
            hashrate: self.hashrate,
            shares_found: self.shares_found,
            pool: self.pool.clone(),
            wallet: self.wallet.clone(),
            coin: MINING_COIN.into(),
        }
    }
}

/// Supervises the external miner subprocess
///
/// Constructed once at startup and shared (behind `Arc`) with every request
/// handler; there is deliberately no global instance.
pub struct MiningSupervisor {
    command: MinerCommand,
    default_pool: String,
    default_wallet: String,
    default_threads: usize,
    inner: Mutex<SessionInner>,
}

impl MiningSupervisor {
    /// Creates a supervisor with an explicit executable lookup strategy
    pub fn new(command: MinerCommand, config: &Config) -> Self {
        log::info!("Miner executable: {}", command);
        MiningSupervisor {
            command,
            default_pool: config.pool.clone(),
            default_wallet: config.wallet.clone(),
            default_threads: config.threads,
            inner: Mutex::new(SessionInner::stopped()),
        }
    }

    /// Creates a supervisor using the config's `miner_path` override when
    /// present, falling back to the per-platform lookup table
    pub fn from_config(config: &Config) -> Self {
        let command = match &config.miner_path {
            Some(path) => MinerCommand::FixedPath(path.clone()),
            None => MinerCommand::for_host(),
        };
        Self::new(command, config)
    }

    /// Starts a mining session
    ///
    /// `pool`, `wallet` and `threads` fall back to the configured defaults
    /// when absent.
    ///
    /// # Errors
    /// * `AlreadyRunningError` - a session is already live
    /// * `ValidationError` - no wallet address available
    /// * `ExecutableNotFoundError` - the miner binary is not installed
    /// * `LaunchError` - the OS refused to spawn the process
    pub fn start(
        &self,
        pool: Option<&str>,
        wallet: Option<&str>,
        threads: Option<usize>,
    ) -> Result<(), MinerError> {
        let mut inner = self.lock();
        if inner.running {
            return Err(MinerError::AlreadyRunningError);
        }

        let pool = pool.unwrap_or(&self.default_pool).to_string();
        let wallet = wallet.unwrap_or(&self.default_wallet).to_string();
        if wallet.is_empty() {
            return Err(MinerError::ValidationError(
                "Wallet address is required".into(),
            ));
        }

        let executable = self.command.locate()?;
        let threads = threads.unwrap_or(self.default_threads);
        let args = launcher::build_args(&pool, &wallet, threads);

        let mut child = Command::new(&executable)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(MinerError::LaunchError)?;

        log::info!(
            "Started miner pid {}: {} {}",
            child.id(),
            executable.display(),
            args.join(" ")
        );

        inner.output = Some(OutputReader::attach(&mut child));
        inner.child = Some(child);
        inner.running = true;
        inner.started_at = Some(SystemTime::now());
        inner.hashrate = 0.0;
        inner.shares_found = 0;
        inner.pool = pool;
        inner.wallet = wallet;
        Ok(())
    }

    /// Stops the current mining session
    ///
    /// Signals the child (SIGTERM on Unix, `taskkill /F /T` on Windows) and
    /// polls briefly for it to exit. Whatever the signalling outcome, the
    /// session is forced back to stopped: the supervisor must never report a
    /// handle it knows is invalid as running.
    ///
    /// # Errors
    /// * `NotRunningError` - no session is live
    /// * `TerminationError` - signal delivery failed (the session is still
    ///   marked stopped)
    pub fn stop(&self) -> Result<(), MinerError> {
        let mut inner = self.lock();
        if !inner.running {
            return Err(MinerError::NotRunningError);
        }

        let result = match inner.child.take() {
            Some(mut child) => {
                let pid = child.id();
                let signalled = signal_terminate(&child);
                reap(&mut child, pid);
                signalled
            }
            None => Ok(()),
        };

        inner.reset();
        result.map_err(MinerError::TerminationError)?;
        log::info!("Miner stopped");
        Ok(())
    }

    /// Returns a snapshot of the session, folding in at most one pending
    /// line of miner output
    ///
    /// Never fails and never blocks on the subprocess. A child observed to
    /// have exited on its own flips the session to stopped before the
    /// snapshot is taken.
    pub fn status(&self) -> MiningStatus {
        let mut inner = self.lock();

        if inner.running {
            let exited = match inner.child.as_mut() {
                Some(child) => matches!(child.try_wait(), Ok(Some(_))),
                None => true,
            };
            if exited {
                log::warn!("Miner exited on its own; marking session stopped");
                inner.reset();
            } else if let Some(reader) = &inner.output {
                match reader.try_read() {
                    ReadOutcome::Ready(line) => {
                        if let Some(delta) = parser::parse_line(&line) {
                            inner.apply(delta);
                        }
                    }
                    // Closed is picked up by try_wait on the next call.
                    ReadOutcome::NotReady | ReadOutcome::Closed => {}
                }
            }
        }

        inner.view()
    }

    /// Web-boundary form of [`start`](Self::start): every error kind becomes
    /// a structured `{status: "error", message}` payload, never a fault
    pub fn start_response(
        &self,
        pool: Option<&str>,
        wallet: Option<&str>,
        threads: Option<usize>,
    ) -> ApiResponse {
        ApiResponse::from_result(
            self.start(pool, wallet, threads),
            "Dogecoin mining started successfully",
        )
    }

    /// Web-boundary form of [`stop`](Self::stop)
    pub fn stop_response(&self) -> ApiResponse {
        ApiResponse::from_result(self.stop(), "Mining stopped successfully")
    }

    /// Whether a session is currently live (without touching the output)
    pub fn running(&self) -> bool {
        self.lock().running
    }

    /// A poisoned lock only means another request panicked mid-operation;
    /// the session data is still the best truth we have
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(unix)]
fn signal_terminate(child: &Child) -> io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM)
        .map_err(|e| io::Error::from_raw_os_error(e as i32))
}

#[cfg(windows)]
fn signal_terminate(child: &Child) -> io::Result<()> {
    // taskkill /T takes the whole process tree down, matching what the
    // bundled cpuminer build needs on Windows.
    let status = Command::new("taskkill")
        .args(["/F", "/T", "/PID", &child.id().to_string()])
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("taskkill exited with {}", status)))
    }
}

/// Polls for the signalled child to exit so it does not linger as a zombie.
/// Bounded: a child that ignores the signal is left to the OS after the
/// window closes.
fn reap(child: &mut Child, pid: u32) {
    let deadline = std::time::Instant::now() + REAP_WINDOW;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("Miner pid {} exited with {}", pid, status);
                return;
            }
            Ok(None) => {
                if std::time::Instant::now() >= deadline {
                    log::warn!("Miner pid {} did not exit within {:?}", pid, REAP_WINDOW);
                    return;
                }
                std::thread::sleep(REAP_POLL);
            }
            Err(e) => {
                log::debug!("try_wait on miner pid {} failed: {}", pid, e);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            wallet: String::new(),
            threads: 2,
            ..Config::default()
        }
    }

    fn supervisor_with(command: MinerCommand) -> MiningSupervisor {
        MiningSupervisor::new(command, &test_config())
    }

    #[test]
    fn stop_when_stopped_is_not_running() {
        let supervisor =
            supervisor_with(MinerCommand::FixedPath("/no/such/miner".into()));
        assert!(matches!(supervisor.stop(), Err(MinerError::NotRunningError)));
        let status = supervisor.status();
        assert!(!status.is_mining);
        assert_eq!(status.coin, "DOGE");
    }

    #[test]
    fn boundary_responses_never_fault() {
        let supervisor =
            supervisor_with(MinerCommand::FixedPath("/no/such/miner".into()));

        let stop = supervisor.stop_response();
        assert_eq!(stop.status, "error");
        assert_eq!(stop.message, "Mining is not running");

        let start = supervisor.start_response(None, Some("D7xyz"), None);
        assert_eq!(start.status, "error");
        assert!(start.message.contains("not found"));
    }

    #[test]
    fn missing_executable_fails_start() {
        let supervisor =
            supervisor_with(MinerCommand::FixedPath("/no/such/miner".into()));
        let result = supervisor.start(None, Some("D7xyz"), None);
        assert!(matches!(
            result,
            Err(MinerError::ExecutableNotFoundError(_))
        ));
        assert!(!supervisor.running());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::sync::Arc;
        use std::time::Instant;

        /// Writes an executable stub standing in for cpuminer. The stub
        /// ignores its arguments, so the real argument vector passes through.
        fn stub_miner(dir: &tempfile::TempDir, body: &str) -> MinerCommand {
            let path = dir.path().join("cpuminer");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            MinerCommand::FixedPath(path)
        }

        fn wait_until(mut done: impl FnMut() -> bool) -> bool {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if done() {
                    return true;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            false
        }

        #[test]
        fn empty_wallet_is_rejected_before_launch() {
            let dir = tempfile::tempdir().unwrap();
            let supervisor = supervisor_with(stub_miner(&dir, "sleep 60"));
            let result = supervisor.start(None, None, None);
            assert!(matches!(result, Err(MinerError::ValidationError(_))));
            assert!(!supervisor.running());
        }

        #[test]
        fn start_status_stop_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let supervisor = supervisor_with(stub_miner(&dir, "sleep 60"));

            supervisor.start(None, Some("D7xyz"), None).unwrap();
            let status = supervisor.status();
            assert!(status.is_mining);
            assert!(status.start_time.is_some());
            assert_eq!(status.hashrate, 0.0);
            assert_eq!(status.shares_found, 0);
            assert_eq!(status.wallet, "D7xyz");

            assert!(matches!(
                supervisor.start(None, Some("D7xyz"), None),
                Err(MinerError::AlreadyRunningError)
            ));

            supervisor.stop().unwrap();
            let status = supervisor.status();
            assert!(!status.is_mining);
            assert_eq!(status.start_time, None);
            assert_eq!(status.hashrate, 0.0);
            assert_eq!(status.shares_found, 0);

            assert!(matches!(supervisor.stop(), Err(MinerError::NotRunningError)));
        }

        #[test]
        fn output_lines_fold_into_status() {
            let dir = tempfile::tempdir().unwrap();
            let supervisor = supervisor_with(stub_miner(
                &dir,
                "echo 'accepted: 1/1 (100.00%)'\necho '5.23 MH/s total'\nsleep 60",
            ));

            supervisor.start(None, Some("D7xyz"), None).unwrap();
            // One line is folded per status call; poll until both landed.
            let converged = wait_until(|| {
                let status = supervisor.status();
                status.shares_found == 1 && status.hashrate == 5.23
            });
            assert!(converged, "miner output never reached the session");

            supervisor.stop().unwrap();
        }

        #[test]
        fn concurrent_double_start_yields_one_success() {
            let dir = tempfile::tempdir().unwrap();
            let supervisor = Arc::new(supervisor_with(stub_miner(&dir, "sleep 60")));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let supervisor = supervisor.clone();
                    std::thread::spawn(move || {
                        supervisor.start(None, Some("D7xyz"), None).is_ok()
                    })
                })
                .collect();
            let successes = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&ok| ok)
                .count();

            assert_eq!(successes, 1);
            assert!(supervisor.running());
            supervisor.stop().unwrap();
        }

        #[test]
        fn external_exit_flips_session_to_stopped() {
            let dir = tempfile::tempdir().unwrap();
            let supervisor = supervisor_with(stub_miner(&dir, "exit 0"));

            supervisor.start(None, Some("D7xyz"), None).unwrap();
            let stopped = wait_until(|| !supervisor.status().is_mining);
            assert!(stopped, "exited miner still reported as running");
            let status = supervisor.status();
            assert_eq!(status.hashrate, 0.0);
            assert_eq!(status.shares_found, 0);
        }

        #[test]
        fn reader_distinguishes_ready_and_closed() {
            let mut child = Command::new("echo")
                .arg("hello")
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .unwrap();
            let reader = OutputReader::attach(&mut child);

            let mut seen_line = None;
            let closed = wait_until(|| match reader.try_read() {
                ReadOutcome::Ready(line) => {
                    seen_line = Some(line);
                    false
                }
                ReadOutcome::NotReady => false,
                ReadOutcome::Closed => true,
            });

            assert!(closed);
            assert_eq!(seen_line.as_deref(), Some("hello"));
            let _ = child.wait();
        }
    }
}
