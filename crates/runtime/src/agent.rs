//! Per-character heartbeat.
//!
//! Character archetypes differ only in the status line they publish and in
//! whether idle accounting is attached, so they are data ([`AgentProfile`])
//! rather than types.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time;
use tracing::{trace, warn};

use crate::api::HostError;
use crate::events::{Event, EventBus, StatusEvent};
use crate::metrics::AgentMetrics;
use crate::query::SafeQuery;
use crate::ticker::{PeriodicTask, Ticker};

/// Composition knobs for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    /// Status line published on every heartbeat.
    pub status: String,
    /// Attach an idle tracker to this character.
    pub idle_tracking: bool,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "Ready".to_string(),
            idle_tracking: false,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_idle_tracking(mut self, enabled: bool) -> Self {
        self.idle_tracking = enabled;
        self
    }

    /// Front-line fighter; idle accounting on.
    pub fn warrior(name: impl Into<String>) -> Self {
        Self::new(name).with_status("Warrior ready").with_idle_tracking(true)
    }

    /// Support caster; idle accounting off.
    pub fn priest(name: impl Into<String>) -> Self {
        Self::new(name).with_status("Priest ready")
    }

    /// Stationary vendor; idle accounting on.
    pub fn merchant(name: impl Into<String>) -> Self {
        Self::new(name).with_status("Merchant open").with_idle_tracking(true)
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self::new("agent")
    }
}

struct HeartbeatTask {
    profile: AgentProfile,
    query: SafeQuery,
    events: EventBus,
    metrics: Arc<AgentMetrics>,
}

impl HeartbeatTask {
    async fn beat(&self) -> bool {
        self.metrics.record_tick();

        let report = self.query.host().report_status(&self.profile.status);
        let error = match time::timeout(self.query.timeout(), report).await {
            Ok(Ok(())) => {
                trace!(character = %self.profile.name, status = %self.profile.status, "status reported");
                self.metrics.record_status(true);
                self.events.publish(Event::Status(StatusEvent::Reported {
                    character: self.profile.name.clone(),
                    status: self.profile.status.clone(),
                }));
                return true;
            }
            Ok(Err(error)) => error,
            Err(_) => HostError::Timeout,
        };

        warn!(character = %self.profile.name, %error, "status report failed");
        self.metrics.record_status(false);
        self.events.publish(Event::Status(StatusEvent::Failed {
            character: self.profile.name.clone(),
            error: error.to_string(),
        }));
        false
    }
}

#[async_trait]
impl PeriodicTask for HeartbeatTask {
    fn name(&self) -> &'static str {
        "agent_loop"
    }

    async fn tick(&self) {
        self.beat().await;
    }
}

/// Supervisory loop that reports status once per period, forever.
///
/// Independent of the idle tracker. Report failures are logged and counted
/// but never stop the loop.
pub struct AgentLoop {
    task: Arc<HeartbeatTask>,
    ticker: Ticker,
}

impl AgentLoop {
    pub fn new(
        profile: AgentProfile,
        query: SafeQuery,
        period: Duration,
        events: EventBus,
        metrics: Arc<AgentMetrics>,
    ) -> Self {
        Self {
            ticker: Ticker::new(period),
            task: Arc::new(HeartbeatTask {
                profile,
                query,
                events,
                metrics,
            }),
        }
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.task.profile
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

    /// Runs one heartbeat immediately; returns whether the status was accepted.
    pub async fn tick(&self) -> bool {
        self.task.beat().await
    }
}
