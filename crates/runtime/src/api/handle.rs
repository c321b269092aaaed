//! Cloneable façade for interacting with a running agent.
//!
//! [`AgentHandle`] hides channel plumbing and offers async helpers for
//! delivering interactions, reading state, and streaming events from specific
//! topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::cooldown::CooldownGate;
use crate::events::{Event, EventBus, InteractionEvent, Topic};
use crate::hooks::HookOutcome;
use crate::idle::IdleGauge;
use crate::metrics::{AgentMetrics, MetricsSnapshot};
use crate::query::{CapacityPredicate, ProximityPredicate, SafeQuery};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct AgentHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    query: SafeQuery,
    gate: Arc<CooldownGate>,
    metrics: Arc<AgentMetrics>,
    idle: Option<IdleGauge>,
}

impl AgentHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        query: SafeQuery,
        gate: Arc<CooldownGate>,
        metrics: Arc<AgentMetrics>,
        idle: Option<IdleGauge>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            query,
            gate,
            metrics,
            idle,
        }
    }

    /// Queue an interaction for the hooks without waiting for the outcome
    pub async fn submit(&self, event: InteractionEvent) -> Result<()> {
        self.command_tx
            .send(Command::Interact { event, reply: None })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Deliver an interaction and wait for every hook's outcome
    pub async fn dispatch(&self, event: InteractionEvent) -> Result<Vec<HookOutcome>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Interact {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        let outcomes = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Idle` - Idle duration reports
    /// - `Topic::Skill` - Reactive skill invocations and failures
    /// - `Topic::Status` - Heartbeat status reports
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Consecutive stationary ticks, if idle tracking is attached
    pub fn idle_ticks(&self) -> Option<u64> {
        self.idle.as_ref().map(IdleGauge::ticks)
    }

    /// Proximity checks against the live game state
    pub fn proximity(&self) -> ProximityPredicate {
        ProximityPredicate::new(self.query.clone())
    }

    /// Inventory capacity checks against the live game state
    pub fn capacity(&self) -> CapacityPredicate {
        CapacityPredicate::new(self.query.clone())
    }

    /// The character's cooldown records
    pub fn cooldowns(&self) -> &Arc<CooldownGate> {
        &self.gate
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
