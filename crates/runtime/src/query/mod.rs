//! Read-only questions about the character's surroundings.
//!
//! All lookups go through [`SafeQuery`], so transient unavailability of the
//! game state yields a conservative answer rather than an error.

mod capacity;
mod proximity;
mod safe;

pub use capacity::{CapacityPredicate, count_free_slots};
pub use proximity::ProximityPredicate;
pub use safe::SafeQuery;
