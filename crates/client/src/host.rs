//! Offline stand-in world for running the agent without a game client.

use agent_runtime::{CharacterState, InMemoryHost, InventorySnapshot, Position, RuntimeConfig};

/// Build an in-memory host whose character can use the configured guard skill.
pub fn offline_host(config: &RuntimeConfig) -> InMemoryHost {
    let host = InMemoryHost::new(CharacterState {
        name: config.profile.name.clone(),
        map: "main".to_string(),
        position: Position::default(),
        mana: config.guard.mana_cost.saturating_mul(10),
        equipped: vec![config.guard.required_item.clone()],
    });
    host.set_inventory(InventorySnapshot {
        empty_slots: Some(42),
        items: None,
    });
    host
}

#[cfg(test)]
mod tests {
    use agent_runtime::GameHost;

    use super::*;

    #[tokio::test]
    async fn character_meets_guard_preconditions() {
        let config = RuntimeConfig::default();
        let host = offline_host(&config);

        let character = host.character().await.unwrap();
        assert_eq!(character.name, config.profile.name);
        assert!(character.has_equipped(&config.guard.required_item));
        assert!(character.mana >= config.guard.mana_cost);
    }
}
