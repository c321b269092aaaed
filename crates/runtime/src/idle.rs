//! Continuous idleness accounting.
//!
//! Once per tick the character is either moving, which resets the counter to
//! exactly 0, or stationary, which adds exactly 1. Every `report_every`-th
//! stationary tick produces an idle report.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, trace};

use crate::events::{Event, EventBus, IdleEvent};
use crate::metrics::AgentMetrics;
use crate::query::SafeQuery;
use crate::ticker::{PeriodicTask, Ticker};

/// What a single tick did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleStep {
    /// Motion observed; the counter is now 0.
    Reset,
    /// Stationary; the counter is now the carried value.
    Accrued(u64),
    /// Stationary and on the report cadence; the counter is now the carried value.
    Report(u64),
}

/// Idle counter of one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleState {
    counter: u64,
}

impl IdleState {
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Applies one tick.
    ///
    /// A `report_every` of 0 disables reports.
    pub fn advance(&mut self, moving: bool, report_every: u64) -> IdleStep {
        if moving {
            self.counter = 0;
            return IdleStep::Reset;
        }

        self.counter = self.counter.saturating_add(1);
        if report_every > 0 && self.counter % report_every == 0 {
            IdleStep::Report(self.counter)
        } else {
            IdleStep::Accrued(self.counter)
        }
    }
}

/// Read-only view of a tracker's counter, shareable across tasks.
#[derive(Debug, Clone, Default)]
pub struct IdleGauge(Arc<AtomicU64>);

impl IdleGauge {
    pub fn ticks(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tracker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleConfig {
    pub period: Duration,
    pub report_every: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            report_every: 5,
        }
    }
}

struct IdleTask {
    character: String,
    query: SafeQuery,
    config: IdleConfig,
    gauge: IdleGauge,
    events: EventBus,
    metrics: Arc<AgentMetrics>,
}

impl IdleTask {
    async fn step(&self) -> IdleStep {
        let moving = self.query.is_moving().await;

        // Only this task writes the gauge.
        let mut state = IdleState {
            counter: self.gauge.ticks(),
        };
        let step = state.advance(moving, self.config.report_every);
        self.gauge.0.store(state.counter(), Ordering::Relaxed);

        trace!(character = %self.character, ticks = state.counter(), moving, "idle tick");

        if let IdleStep::Report(ticks) = step {
            let idle_for = self
                .config
                .period
                .saturating_mul(u32::try_from(ticks).unwrap_or(u32::MAX));
            info!(
                character = %self.character,
                ticks,
                idle_for_secs = idle_for.as_secs_f64(),
                "character idle"
            );
            self.metrics.record_idle_report();
            self.events.publish(Event::Idle(IdleEvent::Report {
                character: self.character.clone(),
                ticks,
                idle_for_ms: u64::try_from(idle_for.as_millis()).unwrap_or(u64::MAX),
            }));
        }

        step
    }
}

#[async_trait]
impl PeriodicTask for IdleTask {
    fn name(&self) -> &'static str {
        "idle_tracker"
    }

    async fn tick(&self) {
        self.step().await;
    }
}

/// Self-scheduling idle counter for one character.
pub struct IdleTracker {
    task: Arc<IdleTask>,
    ticker: Ticker,
}

impl IdleTracker {
    pub fn new(
        character: impl Into<String>,
        query: SafeQuery,
        config: IdleConfig,
        events: EventBus,
        metrics: Arc<AgentMetrics>,
    ) -> Self {
        Self {
            ticker: Ticker::new(config.period),
            task: Arc::new(IdleTask {
                character: character.into(),
                query,
                config,
                gauge: IdleGauge::default(),
                events,
                metrics,
            }),
        }
    }

    pub fn start(&mut self) {
        self.ticker.start(Arc::clone(&self.task));
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    pub async fn shutdown(&mut self) {
        self.ticker.shutdown().await;
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Runs one tick immediately, outside the schedule.
    pub async fn tick(&self) -> IdleStep {
        self.task.step().await
    }

    pub fn idle_ticks(&self) -> u64 {
        self.task.gauge.ticks()
    }

    pub fn gauge(&self) -> IdleGauge {
        self.task.gauge.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use crate::host::{CharacterState, InMemoryHost};

    #[test]
    fn motion_resets_to_exactly_zero() {
        let mut state = IdleState::default();
        for _ in 0..3 {
            state.advance(false, 5);
        }
        assert_eq!(state.counter(), 3);

        assert_eq!(state.advance(true, 5), IdleStep::Reset);
        assert_eq!(state.counter(), 0);

        assert_eq!(state.advance(true, 5), IdleStep::Reset);
        assert_eq!(state.counter(), 0);

        assert_eq!(state.advance(false, 5), IdleStep::Accrued(1));
    }

    #[test]
    fn reports_on_multiples_only() {
        let mut state = IdleState::default();
        let reports: Vec<u64> = (0..12)
            .filter_map(|_| match state.advance(false, 5) {
                IdleStep::Report(ticks) => Some(ticks),
                _ => None,
            })
            .collect();

        assert_eq!(reports, [5, 10]);
        assert_eq!(state.counter(), 12);
    }

    #[test]
    fn zero_cadence_never_reports() {
        let mut state = IdleState::default();
        assert!((0..20).all(|_| !matches!(state.advance(false, 0), IdleStep::Report(_))));
    }

    fn tracker(host: Arc<InMemoryHost>, events: EventBus) -> IdleTracker {
        IdleTracker::new(
            "warden",
            SafeQuery::new(host, Duration::from_millis(100)),
            IdleConfig::default(),
            events,
            Arc::new(AgentMetrics::new()),
        )
    }

    #[tokio::test]
    async fn manual_ticks_follow_motion() {
        let host = Arc::new(InMemoryHost::new(CharacterState::default()));
        let tracker = tracker(host.clone(), EventBus::new());

        assert_eq!(tracker.tick().await, IdleStep::Accrued(1));
        assert_eq!(tracker.tick().await, IdleStep::Accrued(2));

        host.set_driven(true);
        assert_eq!(tracker.tick().await, IdleStep::Reset);
        assert_eq!(tracker.idle_ticks(), 0);

        host.set_driven(false);
        assert_eq!(tracker.tick().await, IdleStep::Accrued(1));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_ticks_publish_reports() {
        let host = Arc::new(InMemoryHost::new(CharacterState::default()));
        let events = EventBus::new();
        let mut idle_rx = events.subscribe(Topic::Idle);
        let mut tracker = tracker(host, events);

        tracker.start();
        tracker.start();
        tokio::time::sleep(Duration::from_millis(12_500)).await;
        tracker.shutdown().await;

        assert_eq!(tracker.idle_ticks(), 12);
        let mut reported = Vec::new();
        while let Ok(Event::Idle(IdleEvent::Report {
            ticks, idle_for_ms, ..
        })) = idle_rx.try_recv()
        {
            assert_eq!(idle_for_ms, ticks * 1000);
            reported.push(ticks);
        }
        assert_eq!(reported, [5, 10]);
    }
}
