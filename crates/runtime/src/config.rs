//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use crate::agent::AgentProfile;
use crate::api::{Result, RuntimeError};
use crate::hooks::SkillTriggerConfig;
use crate::idle::IdleConfig;

/// Configuration shared across the orchestrator and its tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub profile: AgentProfile,
    /// Heartbeat period of the agent loop.
    pub agent_tick: Duration,
    pub idle: IdleConfig,
    /// Upper bound for any single host query.
    pub query_timeout: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub guard: SkillTriggerConfig,
    pub session_id: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            profile: AgentProfile::default(),
            agent_tick: Duration::from_secs(1),
            idle: IdleConfig::default(),
            query_timeout: Duration::from_millis(500),
            event_buffer_size: 100,
            command_buffer_size: 32,
            guard: SkillTriggerConfig::default(),
            session_id: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AGENT_NAME` - Character name (default: agent)
    /// - `AGENT_STATUS` - Heartbeat status line (default: Ready)
    /// - `AGENT_IDLE_TRACKING` - Attach idle tracker (default: false)
    /// - `AGENT_TICK_MS` - Heartbeat period (default: 1000)
    /// - `IDLE_TICK_MS` - Idle tracker period (default: 1000)
    /// - `IDLE_REPORT_EVERY` - Idle ticks between reports (default: 5)
    /// - `QUERY_TIMEOUT_MS` - Host query timeout (default: 500)
    /// - `EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `COMMAND_BUFFER` - Interaction queue size (default: 32)
    /// - `GUARD_SKILL` / `GUARD_ITEM` / `GUARD_MANA_COST` / `GUARD_COOLDOWN_MS` -
    ///   Reactive skill settings (default: scare / jacko / 50 / 1000)
    /// - `AGENT_SESSION_ID` - Session identifier for log files (default: auto-generated)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = env::var("AGENT_NAME") {
            config.profile.name = name;
        }
        if let Ok(status) = env::var("AGENT_STATUS") {
            config.profile.status = status;
        }
        if let Some(enable) = read_env::<bool>("AGENT_IDLE_TRACKING") {
            config.profile.idle_tracking = enable;
        }

        if let Some(ms) = read_env::<u64>("AGENT_TICK_MS") {
            config.agent_tick = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("IDLE_TICK_MS") {
            config.idle.period = Duration::from_millis(ms);
        }
        if let Some(every) = read_env::<u64>("IDLE_REPORT_EVERY") {
            config.idle.report_every = every;
        }
        if let Some(ms) = read_env::<u64>("QUERY_TIMEOUT_MS") {
            config.query_timeout = Duration::from_millis(ms);
        }

        // Channel configuration
        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        if let Ok(skill) = env::var("GUARD_SKILL") {
            config.guard.skill = skill;
        }
        if let Ok(item) = env::var("GUARD_ITEM") {
            config.guard.required_item = item;
        }
        if let Some(cost) = read_env::<u32>("GUARD_MANA_COST") {
            config.guard.mana_cost = cost;
        }
        if let Some(ms) = read_env::<u64>("GUARD_COOLDOWN_MS") {
            config.guard.cooldown = Duration::from_millis(ms);
        }

        config.session_id = env::var("AGENT_SESSION_ID").ok();

        config
    }

    /// Rejects settings the tasks cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.agent_tick.is_zero() {
            return Err(RuntimeError::InvalidConfig("agent tick must be positive".into()));
        }
        if self.idle.period.is_zero() {
            return Err(RuntimeError::InvalidConfig("idle tick must be positive".into()));
        }
        if self.idle.report_every == 0 {
            return Err(RuntimeError::InvalidConfig(
                "idle report cadence must be positive".into(),
            ));
        }
        if self.query_timeout.is_zero() {
            return Err(RuntimeError::InvalidConfig(
                "query timeout must be positive".into(),
            ));
        }
        if self.guard.skill.is_empty() {
            return Err(RuntimeError::InvalidConfig("guard skill name is empty".into()));
        }
        Ok(())
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
