//! Contract for the live game client this core drives.
//!
//! Every external collaborator (motion, lookups, inventory, skills, status
//! sink) is reached through one [`GameHost`] object that is passed explicitly
//! to each component. Implementations wrap the real game connection; the
//! [`InMemoryHost`] stands in for it in tests and offline runs.
mod memory;

pub use memory::{InMemoryHost, SkillInvocation};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::HostResult;

/// Planar position on a map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Motion flags reported by the host.
///
/// `walking` is the character's own movement; `driven` is movement issued by a
/// higher-level movement driver (pathing, follow, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    pub walking: bool,
    pub driven: bool,
}

impl Motion {
    pub fn is_moving(&self) -> bool {
        self.walking || self.driven
    }
}

/// Live view of the controlled character.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacterState {
    pub name: String,
    pub map: String,
    pub position: Position,
    pub mana: u32,
    /// Identifiers of currently equipped items.
    pub equipped: Vec<String>,
}

impl CharacterState {
    pub fn has_equipped(&self, item: &str) -> bool {
        self.equipped.iter().any(|equipped| equipped == item)
    }
}

/// Another entity resolved by name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub name: String,
    pub map: String,
    pub position: Position,
}

/// Raw inventory view; either source may be missing or malformed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventorySnapshot {
    /// Direct count of empty slots, when the host exposes one.
    pub empty_slots: Option<i64>,
    /// Slot list where `None` marks an empty slot.
    pub items: Option<Vec<Option<String>>>,
}

/// Interface to the game client.
///
/// Any method may fail at any time (scene transitions, disconnects). Callers
/// inside this crate go through [`SafeQuery`](crate::query::SafeQuery) so
/// failures degrade to defaults instead of propagating.
#[async_trait]
pub trait GameHost: Send + Sync {
    /// Current motion flags of the character.
    async fn motion(&self) -> HostResult<Motion>;

    /// Snapshot of the controlled character.
    async fn character(&self) -> HostResult<CharacterState>;

    /// Looks up another player by name. `Ok(None)` means not visible.
    async fn find_player(&self, name: &str) -> HostResult<Option<EntityRecord>>;

    /// Distance from the character to `target`.
    async fn distance_to(&self, target: &EntityRecord) -> HostResult<f64>;

    /// Current inventory view.
    async fn inventory(&self) -> HostResult<InventorySnapshot>;

    /// Invokes a skill, optionally against a named target.
    async fn use_skill(&self, skill: &str, target: Option<&str>) -> HostResult<()>;

    /// Publishes a short status line for the character.
    async fn report_status(&self, status: &str) -> HostResult<()>;
}
