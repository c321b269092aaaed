//! Cancellable fixed-period task driver.
//!
//! A [`PeriodicTask`] does a bounded amount of non-blocking work per tick. A
//! [`Ticker`] spawns the loop that calls it once per period and owns the
//! token that stops it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Work performed once per tick.
#[async_trait]
pub trait PeriodicTask: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one tick. Must not fail; failures are handled inside.
    async fn tick(&self);
}

struct Running {
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// Drives one [`PeriodicTask`] at a fixed period.
///
/// `start` and `stop` are idempotent. After `stop` returns no further tick
/// begins; a tick already in flight is allowed to finish. A stopped ticker can
/// be started again.
pub struct Ticker {
    period: Duration,
    running: Option<Running>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.join.is_finished())
    }

    /// Spawns the tick loop for `task` unless one is already live.
    ///
    /// The first tick fires one period after the call. Late ticks are delayed
    /// rather than bunched up.
    pub fn start<T: PeriodicTask>(&mut self, task: Arc<T>) {
        if self.is_running() {
            debug!(task = task.name(), "ticker already running");
            return;
        }

        let token = CancellationToken::new();
        let child = token.clone();
        let period = self.period;
        let join = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(task = task.name(), period_ms = period.as_millis() as u64, "ticker started");

            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = interval.tick() => task.tick().await,
                }
            }

            debug!(task = task.name(), "ticker stopped");
        });

        self.running = Some(Running { token, join });
    }

    /// Cancels the loop; the next scheduled tick will not run.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
        }
    }

    /// Stops the loop and waits for a tick in flight to finish.
    pub async fn shutdown(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
            if let Err(error) = running.join.await {
                warn!(%error, "ticker task ended abnormally");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
