//! In-memory [`GameHost`] implementation for tests and offline runs.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{CharacterState, EntityRecord, GameHost, InventorySnapshot, Motion};
use crate::api::{HostError, HostResult};

/// A skill invocation accepted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillInvocation {
    pub skill: String,
    pub target: Option<String>,
}

#[derive(Default)]
struct World {
    available: bool,
    motion: Motion,
    character: CharacterState,
    players: HashMap<String, EntityRecord>,
    inventory: InventorySnapshot,
    forced_distance: Option<f64>,
    skill_failure: Option<HostError>,
    status_failure: Option<HostError>,
    stalled_skills: bool,
    stalled_status: bool,
    skills: Vec<SkillInvocation>,
    statuses: Vec<String>,
}

/// Mutable stand-in for a live game client.
///
/// State can be changed between ticks to script scenarios, and every accepted
/// skill invocation or status line is recorded for later inspection.
pub struct InMemoryHost {
    world: RwLock<World>,
}

impl InMemoryHost {
    pub fn new(character: CharacterState) -> Self {
        Self {
            world: RwLock::new(World {
                available: true,
                character,
                ..World::default()
            }),
        }
    }

    /// Toggles availability; while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.write().available = available;
    }

    pub fn set_walking(&self, walking: bool) {
        self.write().motion.walking = walking;
    }

    pub fn set_driven(&self, driven: bool) {
        self.write().motion.driven = driven;
    }

    pub fn set_mana(&self, mana: u32) {
        self.write().character.mana = mana;
    }

    pub fn set_map(&self, map: impl Into<String>) {
        self.write().character.map = map.into();
    }

    pub fn equip(&self, item: impl Into<String>) {
        self.write().character.equipped.push(item.into());
    }

    pub fn unequip(&self, item: &str) {
        self.write().character.equipped.retain(|equipped| equipped != item);
    }

    pub fn insert_player(&self, record: EntityRecord) {
        self.write().players.insert(record.name.clone(), record);
    }

    pub fn remove_player(&self, name: &str) {
        self.write().players.remove(name);
    }

    pub fn set_inventory(&self, inventory: InventorySnapshot) {
        self.write().inventory = inventory;
    }

    /// Makes `distance_to` return `distance` verbatim (for malformed values).
    pub fn force_distance(&self, distance: Option<f64>) {
        self.write().forced_distance = distance;
    }

    /// Makes every subsequent `use_skill` fail with `error`.
    pub fn fail_skills(&self, error: Option<HostError>) {
        self.write().skill_failure = error;
    }

    /// Makes every subsequent `report_status` fail with `error`.
    pub fn fail_status(&self, error: Option<HostError>) {
        self.write().status_failure = error;
    }

    /// Makes `use_skill` never complete while `stalled` is set.
    pub fn stall_skills(&self, stalled: bool) {
        self.write().stalled_skills = stalled;
    }

    /// Makes `report_status` never complete while `stalled` is set.
    pub fn stall_status(&self, stalled: bool) {
        self.write().stalled_status = stalled;
    }

    /// Skill invocations accepted so far.
    pub fn skill_log(&self) -> Vec<SkillInvocation> {
        self.read().skills.clone()
    }

    /// Status lines accepted so far.
    pub fn status_log(&self) -> Vec<String> {
        self.read().statuses.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, World> {
        self.world
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.world
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn ensure_available(world: &World) -> HostResult<()> {
        if world.available {
            Ok(())
        } else {
            Err(HostError::Unavailable("client is not connected".into()))
        }
    }
}

#[async_trait]
impl GameHost for InMemoryHost {
    async fn motion(&self) -> HostResult<Motion> {
        let world = self.read();
        Self::ensure_available(&world)?;
        Ok(world.motion)
    }

    async fn character(&self) -> HostResult<CharacterState> {
        let world = self.read();
        Self::ensure_available(&world)?;
        Ok(world.character.clone())
    }

    async fn find_player(&self, name: &str) -> HostResult<Option<EntityRecord>> {
        let world = self.read();
        Self::ensure_available(&world)?;
        Ok(world.players.get(name).cloned())
    }

    async fn distance_to(&self, target: &EntityRecord) -> HostResult<f64> {
        let world = self.read();
        Self::ensure_available(&world)?;
        if let Some(distance) = world.forced_distance {
            return Ok(distance);
        }
        if target.map != world.character.map {
            return Err(HostError::InvalidTarget(format!(
                "{} is on {}, not {}",
                target.name, target.map, world.character.map
            )));
        }
        Ok(world.character.position.distance(&target.position))
    }

    async fn inventory(&self) -> HostResult<InventorySnapshot> {
        let world = self.read();
        Self::ensure_available(&world)?;
        Ok(world.inventory.clone())
    }

    async fn use_skill(&self, skill: &str, target: Option<&str>) -> HostResult<()> {
        let stalled = self.read().stalled_skills;
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut world = self.write();
        Self::ensure_available(&world)?;
        if let Some(error) = world.skill_failure.clone() {
            return Err(error);
        }
        world.skills.push(SkillInvocation {
            skill: skill.to_string(),
            target: target.map(str::to_string),
        });
        Ok(())
    }

    async fn report_status(&self, status: &str) -> HostResult<()> {
        let stalled = self.read().stalled_status;
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut world = self.write();
        Self::ensure_available(&world)?;
        if let Some(error) = world.status_failure.clone() {
            return Err(error);
        }
        world.statuses.push(status.to_string());
        Ok(())
    }
}
