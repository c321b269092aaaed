//! Execution context provided to hooks during evaluation.

use crate::events::EventBus;
use crate::query::SafeQuery;

/// Context provided to hooks when handling an interaction.
///
/// Bundles the host access and observability sinks hooks need without
/// exposing the whole runtime.
pub struct HookContext<'a> {
    /// Failure-absorbing access to the game host
    pub query: &'a SafeQuery,

    /// Event bus for publishing skill events
    pub events: &'a EventBus,
}
