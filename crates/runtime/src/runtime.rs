//! High-level runtime orchestrator.
//!
//! The runtime owns the periodic tasks and the interaction worker, wires up
//! the command channel and event bus, and exposes a builder-based API for
//! clients to attach a game host and reactive hooks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::agent::AgentLoop;
use crate::api::{AgentHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::cooldown::CooldownGate;
use crate::events::{Event, EventBus, Topic};
use crate::hooks::{HookRegistry, InteractionHook, ReactiveSkillTrigger};
use crate::host::GameHost;
use crate::idle::IdleTracker;
use crate::metrics::AgentMetrics;
use crate::query::SafeQuery;
use crate::workers::{Command, InteractionWorker};

/// Main runtime that drives one character.
///
/// Owns the heartbeat, the optional idle tracker, and the interaction
/// worker. [`AgentHandle`] provides a cloneable façade for clients.
pub struct AgentRuntime {
    handle: AgentHandle,
    agent_loop: AgentLoop,
    idle_tracker: Option<IdleTracker>,
    worker_shutdown: CancellationToken,
    worker_handle: JoinHandle<()>,
}

impl AgentRuntime {
    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn character(&self) -> &str {
        &self.agent_loop.profile().name
    }

    /// Whether the heartbeat (and idle tracker, if attached) is scheduled.
    pub fn is_running(&self) -> bool {
        self.agent_loop.is_running()
    }

    /// Schedule the periodic tasks. No-op for tasks already running.
    pub fn start(&mut self) {
        self.agent_loop.start();
        if let Some(tracker) = self.idle_tracker.as_mut() {
            tracker.start();
        }
    }

    /// Cancel the periodic tasks. Interactions are still handled.
    pub fn stop(&mut self) {
        self.agent_loop.stop();
        if let Some(tracker) = self.idle_tracker.as_mut() {
            tracker.stop();
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// Interactions already queued when this is called may be dropped.
    pub async fn shutdown(mut self) -> Result<()> {
        self.agent_loop.shutdown().await;
        if let Some(tracker) = self.idle_tracker.as_mut() {
            tracker.shutdown().await;
        }

        self.worker_shutdown.cancel();
        (&mut self.worker_handle)
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!(character = %self.agent_loop.profile().name, "agent runtime stopped");
        Ok(())
    }
}

/// Builder for [`AgentRuntime`] with flexible configuration.
pub struct AgentRuntimeBuilder {
    config: RuntimeConfig,
    host: Option<Arc<dyn GameHost>>,
    extra_hooks: Vec<Arc<dyn InteractionHook>>,
    hooks: Option<HookRegistry>,
    cooldowns: Vec<(String, Duration)>,
}

impl AgentRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            host: None,
            extra_hooks: Vec::new(),
            hooks: None,
            cooldowns: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required game host
    pub fn host(mut self, host: Arc<dyn GameHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Adds a hook next to the default reactive skill trigger.
    pub fn hook(mut self, hook: Arc<dyn InteractionHook>) -> Self {
        self.extra_hooks.push(hook);
        self
    }

    /// Replace the hook set entirely, default trigger included.
    ///
    /// Hooks added through [`hook`](Self::hook) are ignored once this is set.
    /// [`AgentHandle::cooldowns`] keeps reporting the runtime's own gate,
    /// which hooks in `hooks` do not share: a [`ReactiveSkillTrigger`] built
    /// with [`ReactiveSkillTrigger::new`] keeps its records on a gate of its
    /// own. Use [`hook`](Self::hook) to keep the default trigger on the
    /// shared gate.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Registers an extra cooldown interval on the shared gate.
    pub fn cooldown(mut self, action: impl Into<String>, interval: Duration) -> Self {
        self.cooldowns.push((action.into(), interval));
        self
    }

    /// Build the runtime and schedule its periodic tasks
    pub async fn build(self) -> Result<AgentRuntime> {
        self.config.validate()?;
        let host = self.host.ok_or(RuntimeError::MissingHost)?;
        let config = self.config;

        let gate = Arc::new(CooldownGate::new(
            std::iter::once((config.guard.skill.clone(), config.guard.cooldown))
                .chain(self.cooldowns),
        ));
        let query = SafeQuery::new(host, config.query_timeout);
        let events = EventBus::with_capacity(config.event_buffer_size);
        let metrics = Arc::new(AgentMetrics::new());

        // Use provided hooks or the default trigger plus any extras
        let hooks = self.hooks.unwrap_or_else(|| {
            let mut hooks: Vec<Arc<dyn InteractionHook>> = vec![Arc::new(
                ReactiveSkillTrigger::with_gate(config.guard.clone(), Arc::clone(&gate)),
            )];
            hooks.extend(self.extra_hooks);
            HookRegistry::new(hooks)
        });

        if hooks.is_empty() {
            warn!(character = %config.profile.name, "no interaction hooks installed");
        }
        let hook_count = hooks.len();

        let idle_tracker = config.profile.idle_tracking.then(|| {
            IdleTracker::new(
                config.profile.name.clone(),
                query.clone(),
                config.idle,
                events.clone(),
                Arc::clone(&metrics),
            )
        });

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let handle = AgentHandle::new(
            command_tx,
            events.clone(),
            query.clone(),
            Arc::clone(&gate),
            Arc::clone(&metrics),
            idle_tracker.as_ref().map(IdleTracker::gauge),
        );

        let worker_shutdown = CancellationToken::new();
        let worker = InteractionWorker::new(
            hooks,
            query.clone(),
            events.clone(),
            Arc::clone(&metrics),
            command_rx,
            worker_shutdown.clone(),
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let agent_loop = AgentLoop::new(
            config.profile.clone(),
            query,
            config.agent_tick,
            events,
            metrics,
        );

        let mut runtime = AgentRuntime {
            handle,
            agent_loop,
            idle_tracker,
            worker_shutdown,
            worker_handle,
        };
        runtime.start();

        info!(
            character = %config.profile.name,
            idle_tracking = config.profile.idle_tracking,
            skill = %config.guard.skill,
            hooks = hook_count,
            "agent runtime started"
        );
        Ok(runtime)
    }
}
