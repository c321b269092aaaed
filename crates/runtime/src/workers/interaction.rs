//! Interaction worker that owns the hook registry.
//!
//! Receives commands from [`AgentHandle`](crate::api::AgentHandle), offers
//! each interaction to the hooks, and optionally replies with the outcomes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::events::{EventBus, InteractionEvent};
use crate::hooks::{HookContext, HookOutcome, HookRegistry};
use crate::metrics::AgentMetrics;
use crate::query::SafeQuery;

/// Commands that can be sent to the interaction worker
pub enum Command {
    /// Handle an interaction; reply with per-hook outcomes if requested.
    Interact {
        event: InteractionEvent,
        reply: Option<oneshot::Sender<Vec<(&'static str, HookOutcome)>>>,
    },
}

/// Background task that processes interaction events in arrival order.
pub struct InteractionWorker {
    hooks: HookRegistry,
    query: SafeQuery,
    events: EventBus,
    metrics: Arc<AgentMetrics>,
    command_rx: mpsc::Receiver<Command>,
    shutdown: CancellationToken,
}

impl InteractionWorker {
    /// Creates a new interaction worker.
    pub fn new(
        hooks: HookRegistry,
        query: SafeQuery,
        events: EventBus,
        metrics: Arc<AgentMetrics>,
        command_rx: mpsc::Receiver<Command>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            hooks,
            query,
            events,
            metrics,
            command_rx,
            shutdown,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        debug!("interaction worker stopped");
    }

    async fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::Interact { event, reply } => {
                let ctx = HookContext {
                    query: &self.query,
                    events: &self.events,
                };
                let outcomes = self.hooks.dispatch(&ctx, &self.metrics, &event).await;
                if let Some(reply) = reply {
                    let _ = reply.send(outcomes);
                }
            }
        }
    }
}
