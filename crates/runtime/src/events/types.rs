//! Event types for different topics.

use serde::{Deserialize, Serialize};

/// Incoming interaction aimed at the controlled character.
///
/// Delivered by the game client whenever another actor affects us, e.g. a hit
/// or a heal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Name of the actor that caused the interaction.
    pub actor: String,
    /// Heals, buffs and other helpful interactions.
    #[serde(default)]
    pub beneficial: bool,
    /// Amount of damage (or healing) carried by the interaction.
    #[serde(default)]
    pub amount: u32,
}

impl InteractionEvent {
    pub fn harmful(actor: impl Into<String>, amount: u32) -> Self {
        Self {
            actor: actor.into(),
            beneficial: false,
            amount,
        }
    }

    pub fn beneficial(actor: impl Into<String>, amount: u32) -> Self {
        Self {
            actor: actor.into(),
            beneficial: true,
            amount,
        }
    }
}

/// Idle accounting reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdleEvent {
    /// The character has been stationary for `ticks` consecutive ticks.
    Report {
        character: String,
        ticks: u64,
        idle_for_ms: u64,
    },
}

/// Reactive skill outcomes worth observing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillEvent {
    /// The skill was invoked against `target`.
    Fired { skill: String, target: String },

    /// The host refused or did not confirm the invocation.
    ///
    /// The cooldown record is restored only when the host rejected the call.
    Failed {
        skill: String,
        target: String,
        error: String,
    },
}

/// Status heartbeat outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEvent {
    Reported { character: String, status: String },
    Failed { character: String, error: String },
}
