//! Hook registry for dispatching interactions.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{HookContext, HookOutcome, InteractionHook};
use crate::events::InteractionEvent;
use crate::metrics::AgentMetrics;

/// Registry that holds interaction hooks in priority order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn InteractionHook>]>,
}

impl HookRegistry {
    /// Creates a registry; hooks are sorted by priority (lower values first).
    pub fn new(mut hooks: Vec<Arc<dyn InteractionHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Offers `event` to every hook and collects the outcomes.
    ///
    /// Outcomes are also counted in `metrics`. Skips are logged at trace level
    /// only; failures are warnings.
    pub async fn dispatch(
        &self,
        ctx: &HookContext<'_>,
        metrics: &AgentMetrics,
        event: &InteractionEvent,
    ) -> Vec<(&'static str, HookOutcome)> {
        let mut outcomes = Vec::with_capacity(self.hooks.len());

        for hook in self.hooks.iter() {
            let outcome = hook.on_interaction(ctx, event).await;
            match &outcome {
                HookOutcome::Fired { skill, target } => {
                    metrics.record_skill_fired();
                    debug!(hook = hook.name(), skill = %skill, actor = %target, "hook fired");
                }
                HookOutcome::Skipped(reason) => {
                    metrics.record_skill_skipped();
                    trace!(hook = hook.name(), reason = reason.as_ref(), actor = %event.actor, "hook skipped");
                }
                HookOutcome::Failed { skill, error } => {
                    metrics.record_skill_failure();
                    warn!(hook = hook.name(), skill = %skill, %error, "hook failed");
                }
            }
            outcomes.push((hook.name(), outcome));
        }

        outcomes
    }

    /// Returns the number of hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventBus;
    use crate::host::{CharacterState, InMemoryHost};
    use crate::hooks::SkipReason;
    use crate::query::SafeQuery;

    struct Fixed {
        name: &'static str,
        priority: i32,
    }

    #[async_trait]
    impl InteractionHook for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        async fn on_interaction(
            &self,
            _ctx: &HookContext<'_>,
            _event: &InteractionEvent,
        ) -> HookOutcome {
            HookOutcome::Skipped(SkipReason::OnCooldown)
        }
    }

    #[tokio::test]
    async fn dispatches_in_priority_order() {
        let registry = HookRegistry::new(vec![
            Arc::new(Fixed {
                name: "late",
                priority: 10,
            }) as Arc<dyn InteractionHook>,
            Arc::new(Fixed {
                name: "early",
                priority: -10,
            }) as Arc<dyn InteractionHook>,
        ]);
        let query = SafeQuery::new(
            Arc::new(InMemoryHost::new(CharacterState::default())),
            Duration::from_millis(50),
        );
        let events = EventBus::new();
        let ctx = HookContext {
            query: &query,
            events: &events,
        };
        let metrics = AgentMetrics::new();

        let outcomes = registry
            .dispatch(&ctx, &metrics, &InteractionEvent::harmful("goo", 3))
            .await;

        let names: Vec<_> = outcomes.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["early", "late"]);
        assert_eq!(metrics.snapshot().skills_skipped, 2);
        assert_eq!(registry.len(), 2);
        assert!(HookRegistry::default().is_empty());
    }
}
