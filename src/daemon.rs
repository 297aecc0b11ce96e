//! Background daemon for unread-message sync.
//!
//! Interprets the job schedule from [`crate::sched`]: a user-set periodic
//! trigger, an optional aggressive 15-minute trigger gated on device
//! conditions, and on-demand immediate triggers delivered over a channel.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{mpsc, Notify};
use tokio::time::{interval, sleep_until, Instant};

use crate::app::{AppContext, Result, SnooError};
use crate::config::{Config, ConfigError};
use crate::notifs::JobOutcome;
use crate::sched::{build_schedule, ConditionProbe, JobKind, JobSpec, Trigger, AGGRESSIVE_INTERVAL};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// User-chosen sync interval
    pub user_interval: Duration,
    /// Whether to run a sync immediately on start
    pub sync_on_start: bool,
    /// Delay before retrying a failed sync
    pub retry_backoff: Duration,
    /// Log file path (None = stdout)
    pub log_file: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_config(config: &Config, log_file: Option<PathBuf>) -> Result<Self> {
        let user_interval = config.sync_interval().map_err(config_err)?;
        let retry_backoff = config.retry_backoff().map_err(config_err)?;
        Ok(Self {
            user_interval,
            sync_on_start: config.sync.sync_on_start,
            retry_backoff,
            log_file,
        })
    }
}

fn config_err(e: ConfigError) -> SnooError {
    SnooError::Config(e.to_string())
}

/// Posts immediate sync triggers to a running daemon loop.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<JobSpec>,
}

impl SyncHandle {
    /// Fetch unread messages from the network and update notifications now.
    pub async fn sync_immediately(&self) {
        let _ = self.tx.send(JobSpec::immediate(true)).await;
    }

    /// Re-derive notifications from the cached unread set, without a
    /// network call.
    pub async fn refresh_notifications(&self) {
        let _ = self.tx.send(JobSpec::immediate(false)).await;
    }
}

/// Daemon runner
pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
    probe: Arc<dyn ConditionProbe + Send + Sync>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    rx: std::sync::Mutex<Option<mpsc::Receiver<JobSpec>>>,
    handle: SyncHandle,
}

impl Daemon {
    pub fn new(
        ctx: Arc<AppContext>,
        config: DaemonConfig,
        probe: Arc<dyn ConditionProbe + Send + Sync>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(8);
        Self {
            ctx,
            config,
            probe,
            running: Arc::new(AtomicBool::new(true)),
            shutdown: Arc::new(Notify::new()),
            rx: std::sync::Mutex::new(Some(rx)),
            handle: SyncHandle { tx },
        }
    }

    pub fn sync_handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    /// Get the PID file path
    pub fn pid_file_path() -> Option<PathBuf> {
        dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .map(|d| d.join("snoowatch").join("daemon.pid"))
    }

    /// Check if another daemon is already running
    pub fn is_running() -> bool {
        if let Some(pid_path) = Self::pid_file_path() {
            if pid_path.exists() {
                if let Ok(pid_str) = fs::read_to_string(&pid_path) {
                    if let Ok(pid) = pid_str.trim().parse::<u32>() {
                        return Self::process_exists(pid);
                    }
                }
            }
        }
        false
    }

    #[cfg(unix)]
    fn process_exists(pid: u32) -> bool {
        use std::process::Command;
        Command::new("kill")
            .args(["-0", &pid.to_string()])
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    fn process_exists(pid: u32) -> bool {
        use std::process::Command;
        Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid)])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains(&pid.to_string()))
            .unwrap_or(false)
    }

    fn write_pid_file(&self) -> std::io::Result<()> {
        if let Some(pid_path) = Self::pid_file_path() {
            if let Some(parent) = pid_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(&pid_path)?;
            writeln!(file, "{}", std::process::id())?;
        }
        Ok(())
    }

    fn remove_pid_file(&self) {
        if let Some(pid_path) = Self::pid_file_path() {
            let _ = fs::remove_file(pid_path);
        }
    }

    /// Log a message with timestamp
    fn log(&self, msg: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] {}", timestamp, msg);

        if let Some(ref log_path) = self.config.log_file {
            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
            {
                let _ = writeln!(file, "{}", line);
            }
        } else {
            println!("{}", line);
        }
    }

    /// Run the daemon
    pub async fn run(&self) -> Result<()> {
        if Self::is_running() {
            return Err(SnooError::Other(
                "Another daemon instance is already running".to_string(),
            ));
        }

        self.write_pid_file()
            .map_err(|e| SnooError::Other(format!("Failed to write PID file: {}", e)))?;

        let running = self.running.clone();
        let shutdown = self.shutdown.clone();

        #[cfg(unix)]
        {
            tokio::spawn(async move {
                let mut sigterm =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                        .expect("Failed to set up SIGTERM handler");
                let mut sigint =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
                        .expect("Failed to set up SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                running.store(false, Ordering::SeqCst);
                shutdown.notify_one();
            });
        }

        #[cfg(windows)]
        {
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                running.store(false, Ordering::SeqCst);
                shutdown.notify_one();
            });
        }

        let schedule = build_schedule(self.config.user_interval);
        let aggressive_spec = schedule.iter().copied().find(|s| s.kind == JobKind::Aggressive);

        self.log(&format!(
            "snoowatch daemon started (interval: {}, aggressive 15m check: {}, PID: {})",
            Config::format_interval(self.config.user_interval.as_secs()),
            if aggressive_spec.is_some() { "on" } else { "off" },
            std::process::id()
        ));

        if self.config.sync_on_start {
            self.log("Running initial sync...");
            self.run_sync(true).await;
        }

        let result = self.run_loop().await;

        self.log("Daemon shutting down...");
        self.remove_pid_file();

        result
    }

    /// The daemon's event loop: periodic triggers, constraint-gated
    /// aggressive ticks, immediate triggers from the channel, retries.
    /// Split from [`run`](Self::run) so it can be driven without pid
    /// files or signal handlers.
    async fn run_loop(&self) -> Result<()> {
        let schedule = build_schedule(self.config.user_interval);
        let aggressive_spec = schedule.iter().copied().find(|s| s.kind == JobKind::Aggressive);

        let mut user_timer = interval(self.config.user_interval);
        user_timer.tick().await; // Skip the first immediate tick

        let mut aggressive_timer = interval(AGGRESSIVE_INTERVAL);
        aggressive_timer.tick().await;

        let mut rx = self
            .rx
            .lock()
            .map_err(|e| SnooError::Other(format!("Daemon state poisoned: {e}")))?
            .take()
            .ok_or_else(|| SnooError::Other("Daemon already ran".to_string()))?;

        let mut retry_at: Option<Instant> = None;

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                _ = self.shutdown.notified() => break,

                _ = user_timer.tick() => {
                    self.log("Running scheduled sync...");
                    retry_at = self.run_sync(true).await;
                }

                _ = aggressive_timer.tick(), if aggressive_spec.is_some() => {
                    let spec = aggressive_spec.as_ref().expect("guarded by select condition");
                    if self.probe.satisfies(spec) {
                        self.log("Running aggressive sync...");
                        retry_at = self.run_sync(true).await;
                    } else {
                        tracing::debug!("Aggressive sync skipped: constraints not met");
                    }
                }

                Some(spec) = rx.recv() => {
                    if let Trigger::Immediate { refresh } = spec.trigger {
                        self.log(if refresh {
                            "Running on-demand sync..."
                        } else {
                            "Refreshing notifications from cache..."
                        });
                        retry_at = self.run_sync(refresh).await;
                    }
                }

                _ = sleep_until(retry_at.unwrap_or_else(Instant::now)), if retry_at.is_some() => {
                    self.log("Retrying failed sync...");
                    retry_at = self.run_sync(true).await;
                }
            }
        }

        Ok(())
    }

    /// Run one sync cycle; returns the retry deadline if the outcome asks
    /// for a reschedule.
    async fn run_sync(&self, refresh: bool) -> Option<Instant> {
        match self.ctx.sync_job.run(refresh).await {
            JobOutcome::Skipped => {
                self.log("Sync already in flight, skipped");
                None
            }
            JobOutcome::Completed {
                needs_reschedule: true,
            } => {
                self.log(&format!(
                    "Sync failed, retrying in {}",
                    Config::format_interval(self.config.retry_backoff.as_secs())
                ));
                Some(Instant::now() + self.config.retry_backoff)
            }
            JobOutcome::Completed {
                needs_reschedule: false,
            } => None,
        }
    }

    /// Stop the daemon (called externally)
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

/// Stop a running daemon by reading PID file and sending signal
pub fn stop_daemon() -> std::result::Result<(), String> {
    let pid_path =
        Daemon::pid_file_path().ok_or_else(|| "Could not determine PID file path".to_string())?;

    if !pid_path.exists() {
        return Err("No daemon is running (PID file not found)".to_string());
    }

    let pid_str =
        fs::read_to_string(&pid_path).map_err(|e| format!("Failed to read PID file: {}", e))?;

    let pid: u32 = pid_str
        .trim()
        .parse()
        .map_err(|_| "Invalid PID in PID file".to_string())?;

    #[cfg(unix)]
    {
        use std::process::Command;
        let status = Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .status()
            .map_err(|e| format!("Failed to send signal: {}", e))?;

        if status.success() {
            let _ = fs::remove_file(&pid_path);
            Ok(())
        } else {
            Err(format!("Failed to stop daemon (PID {})", pid))
        }
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let status = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .status()
            .map_err(|e| format!("Failed to stop process: {}", e))?;

        if status.success() {
            let _ = fs::remove_file(&pid_path);
            Ok(())
        } else {
            Err(format!("Failed to stop daemon (PID {})", pid))
        }
    }
}

/// Check daemon status
pub fn daemon_status() -> String {
    if let Some(pid_path) = Daemon::pid_file_path() {
        if pid_path.exists() {
            if let Ok(pid_str) = fs::read_to_string(&pid_path) {
                if let Ok(pid) = pid_str.trim().parse::<u32>() {
                    if Daemon::process_exists(pid) {
                        return format!("Daemon is running (PID: {})", pid);
                    } else {
                        return "Daemon is not running (stale PID file)".to_string();
                    }
                }
            }
        }
    }
    "Daemon is not running".to_string()
}
