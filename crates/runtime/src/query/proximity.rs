//! "Is this player close to me" checks.

use tracing::trace;

use super::SafeQuery;

/// Answers distance questions about named players.
///
/// Distance is only defined between entities on the same map; a player on
/// another map is never nearby and has no distance.
#[derive(Clone)]
pub struct ProximityPredicate {
    query: SafeQuery,
}

impl ProximityPredicate {
    pub fn new(query: SafeQuery) -> Self {
        Self { query }
    }

    /// Distance to the named player, or `None` when it cannot be computed
    /// (unknown player, different map, host failure, malformed value).
    pub async fn distance_to_player(&self, name: &str) -> Option<f64> {
        let target = self.query.find_player(name).await?;
        let me = self.query.character().await?;
        if target.map != me.map {
            trace!(player = name, their_map = %target.map, our_map = %me.map, "player on another map");
            return None;
        }
        self.query.distance_to(&target).await
    }

    /// True iff the named player is on our map within `max_distance` (inclusive).
    pub async fn is_nearby(&self, name: &str, max_distance: f64) -> bool {
        self.distance_to_player(name)
            .await
            .is_some_and(|distance| distance <= max_distance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::host::{CharacterState, EntityRecord, InMemoryHost, Position};

    fn setup() -> (Arc<InMemoryHost>, ProximityPredicate) {
        let host = Arc::new(InMemoryHost::new(CharacterState {
            name: "warden".into(),
            map: "main".into(),
            position: Position::new(0.0, 0.0),
            ..CharacterState::default()
        }));
        host.insert_player(EntityRecord {
            name: "ally".into(),
            map: "main".into(),
            position: Position::new(30.0, 40.0),
        });
        let predicate =
            ProximityPredicate::new(SafeQuery::new(host.clone(), Duration::from_millis(50)));
        (host, predicate)
    }

    #[tokio::test]
    async fn boundary_distance_is_nearby() {
        let (_host, predicate) = setup();

        assert_eq!(predicate.distance_to_player("ally").await, Some(50.0));
        assert!(predicate.is_nearby("ally", 50.0).await);
        assert!(predicate.is_nearby("ally", 120.0).await);
        assert!(!predicate.is_nearby("ally", 49.9).await);
    }

    #[tokio::test]
    async fn unknown_player_is_not_nearby() {
        let (_host, predicate) = setup();

        assert_eq!(predicate.distance_to_player("stranger").await, None);
        assert!(!predicate.is_nearby("stranger", f64::MAX).await);
    }

    #[tokio::test]
    async fn other_map_is_not_nearby() {
        let (host, predicate) = setup();
        host.insert_player(EntityRecord {
            name: "ally".into(),
            map: "cave".into(),
            position: Position::new(0.0, 0.0),
        });

        assert_eq!(predicate.distance_to_player("ally").await, None);
        assert!(!predicate.is_nearby("ally", 1000.0).await);
    }

    #[tokio::test]
    async fn failed_distance_is_not_nearby() {
        let (host, predicate) = setup();
        host.force_distance(Some(f64::INFINITY));

        assert!(!predicate.is_nearby("ally", f64::MAX).await);

        host.force_distance(None);
        host.set_available(false);
        assert!(!predicate.is_nearby("ally", f64::MAX).await);
    }
}
