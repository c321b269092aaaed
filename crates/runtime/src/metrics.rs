//! Agent activity counters.
//!
//! Updated by the periodic tasks and interaction hooks; read by clients for
//! monitoring and debugging. Uses atomics for lock-free access across tasks.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct AgentMetrics {
    /// Heartbeat ticks executed
    ticks: AtomicU64,

    /// Status lines accepted by the host
    status_reports: AtomicU64,

    /// Status lines the host failed to accept
    status_failures: AtomicU64,

    /// Idle reports emitted
    idle_reports: AtomicU64,

    /// Reactive skills invoked
    skills_fired: AtomicU64,

    /// Interactions that did not meet the trigger preconditions
    skills_skipped: AtomicU64,

    /// Invocations the host refused
    skill_failures: AtomicU64,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status(&self, accepted: bool) {
        let counter = if accepted {
            &self.status_reports
        } else {
            &self.status_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_idle_report(&self) {
        self.idle_reports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skill_fired(&self) {
        self.skills_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skill_skipped(&self) {
        self.skills_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skill_failure(&self) {
        self.skill_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Creates a snapshot of all counters for display/logging.
    ///
    /// Note: individual fields are read atomically but the snapshot as a whole
    /// may be inconsistent if counters are being updated concurrently.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            status_reports: self.status_reports.load(Ordering::Relaxed),
            status_failures: self.status_failures.load(Ordering::Relaxed),
            idle_reports: self.idle_reports.load(Ordering::Relaxed),
            skills_fired: self.skills_fired.load(Ordering::Relaxed),
            skills_skipped: self.skills_skipped.load(Ordering::Relaxed),
            skill_failures: self.skill_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub status_reports: u64,
    pub status_failures: u64,
    pub idle_reports: u64,
    pub skills_fired: u64,
    pub skills_skipped: u64,
    pub skill_failures: u64,
}

impl MetricsSnapshot {
    /// Share of status reports the host accepted, as a percentage (0-100).
    pub fn status_success_rate(&self) -> f64 {
        let total = self.status_reports + self.status_failures;
        if total == 0 {
            100.0
        } else {
            (self.status_reports as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rate_counts_failures() {
        let metrics = AgentMetrics::new();
        assert_eq!(metrics.snapshot().status_success_rate(), 100.0);

        metrics.record_status(true);
        metrics.record_status(true);
        metrics.record_status(true);
        metrics.record_status(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.status_reports, 3);
        assert_eq!(snapshot.status_failures, 1);
        assert_eq!(snapshot.status_success_rate(), 75.0);
    }
}
