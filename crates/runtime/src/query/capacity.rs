//! Free inventory capacity checks.

use super::SafeQuery;
use crate::host::InventorySnapshot;

/// Counts empty slots in an inventory view.
///
/// The direct counter wins when it is present and non-negative; otherwise the
/// slot list is scanned. With neither usable the answer is 0, never an assumed
/// amount of room.
pub fn count_free_slots(inventory: &InventorySnapshot) -> u32 {
    if let Some(count) = inventory.empty_slots.filter(|count| *count >= 0) {
        return u32::try_from(count).unwrap_or(u32::MAX);
    }
    inventory
        .items
        .as_ref()
        .map(|items| items.iter().filter(|slot| slot.is_none()).count())
        .map_or(0, |free| u32::try_from(free).unwrap_or(u32::MAX))
}

/// Answers "how much room is left" against the live inventory.
#[derive(Clone)]
pub struct CapacityPredicate {
    query: SafeQuery,
}

impl CapacityPredicate {
    pub fn new(query: SafeQuery) -> Self {
        Self { query }
    }

    /// Free slot count, 0 when the inventory cannot be read.
    pub async fn free_slots(&self) -> u32 {
        self.query
            .inventory()
            .await
            .map_or(0, |inventory| count_free_slots(&inventory))
    }

    /// `free_slots() <= max`.
    ///
    /// A non-finite `max` (NaN, ±∞, an unparsable threshold) is invalid
    /// configuration and always yields `false`.
    pub async fn has_at_most_free_slots(&self, max: f64) -> bool {
        if !max.is_finite() {
            return false;
        }
        f64::from(self.free_slots().await) <= max
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::host::{CharacterState, InMemoryHost};

    fn slots(layout: &[bool]) -> Option<Vec<Option<String>>> {
        Some(
            layout
                .iter()
                .map(|filled| filled.then(|| "item".to_string()))
                .collect(),
        )
    }

    #[test]
    fn direct_count_takes_precedence() {
        let inventory = InventorySnapshot {
            empty_slots: Some(7),
            items: slots(&[true, false]),
        };
        assert_eq!(count_free_slots(&inventory), 7);
    }

    #[test]
    fn falls_back_to_item_list() {
        let inventory = InventorySnapshot {
            empty_slots: Some(-3),
            items: slots(&[true, false, false, true, false]),
        };
        assert_eq!(count_free_slots(&inventory), 3);
    }

    #[test]
    fn unknown_inventory_has_no_room() {
        assert_eq!(count_free_slots(&InventorySnapshot::default()), 0);
    }

    fn predicate(inventory: InventorySnapshot) -> (Arc<InMemoryHost>, CapacityPredicate) {
        let host = Arc::new(InMemoryHost::new(CharacterState::default()));
        host.set_inventory(inventory);
        let predicate =
            CapacityPredicate::new(SafeQuery::new(host.clone(), Duration::from_millis(50)));
        (host, predicate)
    }

    #[tokio::test]
    async fn threshold_comparison_is_inclusive() {
        let (_host, predicate) = predicate(InventorySnapshot {
            empty_slots: Some(4),
            items: None,
        });

        assert_eq!(predicate.free_slots().await, 4);
        assert!(predicate.has_at_most_free_slots(4.0).await);
        assert!(predicate.has_at_most_free_slots(10.0).await);
        assert!(!predicate.has_at_most_free_slots(3.0).await);
        assert!(!predicate.has_at_most_free_slots(-1.0).await);
    }

    #[tokio::test]
    async fn invalid_thresholds_are_false() {
        let (_host, predicate) = predicate(InventorySnapshot {
            empty_slots: Some(0),
            items: None,
        });
        let unparsable = "abc".parse::<f64>().unwrap_or(f64::NAN);

        assert!(!predicate.has_at_most_free_slots(f64::NAN).await);
        assert!(!predicate.has_at_most_free_slots(unparsable).await);
        assert!(!predicate.has_at_most_free_slots(f64::NEG_INFINITY).await);
        assert!(!predicate.has_at_most_free_slots(f64::INFINITY).await);
    }

    #[tokio::test]
    async fn unreadable_inventory_reports_zero() {
        let (host, predicate) = predicate(InventorySnapshot {
            empty_slots: Some(12),
            items: None,
        });
        host.set_available(false);

        assert_eq!(predicate.free_slots().await, 0);
        assert!(predicate.has_at_most_free_slots(0.0).await);
    }
}
