//! Interaction hook system.
//!
//! Hooks react to [`InteractionEvent`]s delivered by the game client. Each
//! hook inspects the event and the live character state and may invoke a
//! skill through the host.
//!
//! # Architecture
//!
//! - Hooks are registered in the runtime builder and sorted by priority
//! - Every incoming interaction is offered to every hook in priority order
//! - A hook that does not apply returns [`HookOutcome::Skipped`] silently
//! - Host failures come back as [`HookOutcome::Failed`] and never propagate

mod context;
mod registry;
mod skill_trigger;

pub use context::HookContext;
pub use registry::HookRegistry;
pub use skill_trigger::{ReactiveSkillTrigger, SkillTriggerConfig};

use async_trait::async_trait;
use strum::{AsRefStr, Display};

use crate::api::HostError;
use crate::events::InteractionEvent;

/// Why a hook let an interaction pass without acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Heals and other helpful interactions never provoke a reaction.
    Beneficial,
    /// The item the skill depends on is not equipped.
    MissingItem,
    /// Not enough mana (or other resource) to pay for the skill.
    InsufficientResource,
    /// The skill was used too recently.
    OnCooldown,
    /// The character state could not be read.
    StateUnavailable,
}

/// Result of offering one interaction to one hook.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// A skill was invoked against `target`.
    Fired { skill: String, target: String },

    /// Preconditions were not met; nothing changed.
    Skipped(SkipReason),

    /// The host refused or did not confirm the invocation.
    Failed { skill: String, error: HostError },
}

impl HookOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, HookOutcome::Fired { .. })
    }
}

/// Reaction to interactions aimed at the character.
///
/// # Execution Order
///
/// Hooks are sorted by priority (lower values execute first).
#[async_trait]
pub trait InteractionHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Returns the execution priority. Lower values execute first.
    fn priority(&self) -> i32 {
        0
    }

    /// Handles one interaction.
    ///
    /// Must not block and must not fail: every failure is folded into the
    /// returned outcome.
    async fn on_interaction(&self, ctx: &HookContext<'_>, event: &InteractionEvent)
    -> HookOutcome;
}
