//! Reactive control core for scripted game characters.
//!
//! This crate wires together a game host abstraction, fault-tolerant state
//! queries, cooldown gating, and periodic tasks into a cohesive runtime API.
//! Consumers embed [`AgentRuntime`] to drive one character, deliver
//! interactions, and observe what it does through [`AgentHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`host`] defines the game host contract and an in-memory host
//! - [`query`] wraps host calls so they degrade to safe defaults
//! - [`cooldown`] and [`hooks`] implement the reactive skill trigger
//! - [`ticker`], [`idle`], and [`agent`] provide the periodic tasks
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
pub mod agent;
pub mod api;
pub mod config;
pub mod cooldown;
pub mod events;
pub mod hooks;
pub mod host;
pub mod idle;
pub mod metrics;
pub mod query;
pub mod runtime;
pub mod ticker;

mod workers;

pub use agent::{AgentLoop, AgentProfile};
pub use api::{AgentHandle, HostError, HostResult, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use cooldown::{CooldownGate, CooldownReservation};
pub use events::{
    Event, EventBus, IdleEvent, InteractionEvent, SkillEvent, StatusEvent, Topic,
};
pub use hooks::{
    HookContext, HookOutcome, HookRegistry, InteractionHook, ReactiveSkillTrigger, SkipReason,
    SkillTriggerConfig,
};
pub use host::{
    CharacterState, EntityRecord, GameHost, InMemoryHost, InventorySnapshot, Motion, Position,
    SkillInvocation,
};
pub use idle::{IdleConfig, IdleGauge, IdleState, IdleStep, IdleTracker};
pub use metrics::{AgentMetrics, MetricsSnapshot};
pub use query::{CapacityPredicate, ProximityPredicate, SafeQuery, count_free_slots};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder};
pub use ticker::{PeriodicTask, Ticker};
