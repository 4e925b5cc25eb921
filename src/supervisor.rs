//! Process-lifecycle supervisor for the sleep-inhibiting child process
//!
//! Owns the single external inhibitor process and all interaction with it:
//! spawning detached into its own process group, liveness tracking,
//! elapsed/remaining arithmetic, and graceful-then-forceful termination on
//! every shutdown path. At most one child is tracked at a time; starting a
//! new session always terminates the old one first.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::modes::{format_interval, SleepMode};
use crate::types::{InhibitorConfig, StatusReport, SupervisorError};

/// One sleep prevention session: the child plus its timing metadata.
/// The timing fields are only meaningful while the child is alive and are
/// cleared together with the handle.
struct SleepSession {
    child: Child,
    started_at: DateTime<Local>,
    planned_duration_secs: Option<u64>,
}

/// Result of a successful spawn.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub mode: SleepMode,
    pub duration_minutes: Option<u64>,
    pub process_id: u32,
    pub start_time: String,
}

/// Result of a stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { duration_active: Option<String> },
    NotRunning,
}

/// Supervises the single external inhibitor process.
#[derive(Clone)]
pub struct SleepSupervisor {
    config: InhibitorConfig,
    session: Arc<Mutex<Option<SleepSession>>>,
}

impl SleepSupervisor {
    pub fn new(config: InhibitorConfig) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(None)),
        }
    }

    fn grace_period(&self) -> Duration {
        Duration::from_secs(self.config.grace_period_secs)
    }

    /// Start a session, terminating any tracked child first. Start never
    /// fails because a session is already running.
    pub async fn start(
        &self,
        mode: SleepMode,
        duration_minutes: Option<u64>,
    ) -> Result<StartedSession, SupervisorError> {
        let mut session = self.session.lock().await;
        if let Some(mut old) = session.take() {
            terminate(&mut old, self.grace_period()).await;
        }

        let planned_duration_secs = duration_minutes.map(|minutes| minutes * 60);

        let mut cmd = Command::new(&self.config.command);
        cmd.args(mode.flags());
        if let Some(secs) = planned_duration_secs {
            cmd.arg("-t").arg(secs.to_string());
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0); // New process group for clean kill

        tracing::info!(
            command = %self.config.command,
            mode = %mode,
            duration_minutes = ?duration_minutes,
            "spawning sleep inhibitor"
        );

        let child = cmd.spawn()?;
        let process_id = child.id().unwrap_or(0);
        let started_at = Local::now();

        tracing::info!(pid = process_id, "sleep inhibitor started");

        *session = Some(SleepSession {
            child,
            started_at,
            planned_duration_secs,
        });

        Ok(StartedSession {
            mode,
            duration_minutes,
            process_id,
            start_time: started_at.to_rfc3339(),
        })
    }

    /// Stop the tracked session, if any, reporting how long it was active.
    pub async fn stop(&self) -> StopOutcome {
        let mut session = self.session.lock().await;
        match session.take() {
            None => StopOutcome::NotRunning,
            Some(mut active) => {
                terminate(&mut active, self.grace_period()).await;
                let elapsed = (Local::now() - active.started_at).num_seconds();
                tracing::info!(elapsed_secs = elapsed, "sleep inhibitor stopped");
                StopOutcome::Stopped {
                    duration_active: Some(format_interval(elapsed)),
                }
            }
        }
    }

    /// Report the current session state. Performs a non-blocking liveness
    /// check and clears the session if the child exited on its own.
    pub async fn status(&self) -> StatusReport {
        let mut session = self.session.lock().await;

        let Some(active) = session.as_mut() else {
            return StatusReport::inactive();
        };

        if let Ok(Some(status)) = active.child.try_wait() {
            tracing::info!(exit_status = ?status.code(), "sleep inhibitor exited on its own");
            *session = None;
            return StatusReport::inactive();
        }

        let now = Local::now();
        let elapsed = now - active.started_at;
        let elapsed_seconds = elapsed.num_seconds();

        let mut report = StatusReport {
            active: true,
            process_id: active.child.id(),
            elapsed_seconds: Some(elapsed_seconds),
            start_time: Some(active.started_at.to_rfc3339()),
            remaining_seconds: None,
            remaining_time: None,
            status: None,
        };

        if let Some(planned_secs) = active.planned_duration_secs {
            let remaining_ms = planned_secs as i64 * 1_000 - elapsed.num_milliseconds();
            if remaining_ms > 0 {
                let remaining_seconds = remaining_ms / 1_000;
                report.remaining_seconds = Some(remaining_seconds);
                report.remaining_time = Some(format_interval(remaining_seconds));
            } else {
                // The child's own -t timeout is the authority; we only
                // report the discrepancy while it winds down.
                report.remaining_seconds = Some(0);
                report.status =
                    Some("Duration expired but process may still be running".to_string());
            }
        }

        report
    }

    /// Terminate any tracked child. Used on end-of-input and on shutdown
    /// signals; safe to call when nothing is running.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        if let Some(mut active) = session.take() {
            tracing::info!("shutting down, terminating sleep inhibitor");
            terminate(&mut active, self.grace_period()).await;
        }
    }
}

/// Graceful-then-forceful termination of the session's process group.
///
/// SIGTERM first, then a bounded wait for exit, then SIGKILL. Signal errors
/// mean the process is already gone and are swallowed; the caller clears the
/// tracked handle unconditionally.
async fn terminate(session: &mut SleepSession, grace: Duration) {
    if let Ok(Some(_)) = session.child.try_wait() {
        return;
    }
    let Some(pid) = session.child.id() else {
        return;
    };
    let pgid = Pid::from_raw(pid as i32);

    tracing::debug!(pid, "sending SIGTERM to inhibitor process group");
    let _ = killpg(pgid, Signal::SIGTERM);

    if tokio::time::timeout(grace, session.child.wait()).await.is_err() {
        tracing::warn!(pid, "inhibitor did not exit within grace period, sending SIGKILL");
        let _ = killpg(pgid, Signal::SIGKILL);
        let _ = session.child.wait().await;
    }
}
