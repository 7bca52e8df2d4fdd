//! Session timer.
//!
//! Publishes elapsed whole seconds once per second from a background task
//! while running. The task is aborted on stop, reset and drop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Display refresh interval.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Format seconds as `mm:ss`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed-time clock tied to a walking session.
pub struct SessionTimer {
    started_at: Option<Instant>,
    /// Elapsed time frozen at stop
    final_elapsed: Option<Duration>,
    tick_tx: Arc<watch::Sender<u64>>,
    task: Option<JoinHandle<()>>,
}

impl SessionTimer {
    pub fn new() -> Self {
        let (tick_tx, _) = watch::channel(0);
        Self {
            started_at: None,
            final_elapsed: None,
            tick_tx: Arc::new(tick_tx),
            task: None,
        }
    }

    /// Receive elapsed seconds on every tick.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tick_tx.subscribe()
    }

    /// Whether the timer is running.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Start counting from zero. Does nothing if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let started_at = Instant::now();
        self.started_at = Some(started_at);
        self.final_elapsed = None;

        let tick_tx = self.tick_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                tick_tx.send_replace(started_at.elapsed().as_secs());
            }
        }));

        tracing::info!("Session timer started");
    }

    /// Stop counting and freeze the elapsed time.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.final_elapsed = self.started_at.map(|s| s.elapsed());
            tracing::info!("Session timer stopped at {}", self.formatted());
        }
    }

    /// Stop and clear back to `00:00`.
    pub fn reset(&mut self) {
        self.stop();
        self.started_at = None;
        self.final_elapsed = None;
        self.tick_tx.send_replace(0);
    }

    /// Elapsed time, frozen once stopped.
    pub fn elapsed(&self) -> Duration {
        match (self.final_elapsed, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started_at)) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// Elapsed whole seconds.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// Elapsed time as `mm:ss`.
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
