//! Hook that answers hostile interactions with a defensive skill.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{info, warn};

use super::{HookContext, HookOutcome, InteractionHook, SkipReason};
use crate::api::HostError;
use crate::cooldown::CooldownGate;
use crate::events::{Event, InteractionEvent, SkillEvent};

/// Which skill to answer with and what it takes to cast it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTriggerConfig {
    pub skill: String,
    /// Item that must be equipped for the skill to be available.
    pub required_item: String,
    pub mana_cost: u32,
    /// Minimum spacing between two invocations.
    pub cooldown: Duration,
}

impl Default for SkillTriggerConfig {
    fn default() -> Self {
        Self {
            skill: "scare".to_string(),
            required_item: "jacko".to_string(),
            mana_cost: 50,
            cooldown: Duration::from_millis(1000),
        }
    }
}

/// Invokes the configured skill against whoever harmed the character.
///
/// # Behavior
///
/// For every interaction, all of the following must hold, in order:
/// 1. the interaction was harmful
/// 2. the required item is equipped
/// 3. the character can pay the mana cost
/// 4. the cooldown gate grants the skill
///
/// The gate is claimed atomically before the host call, so a burst of
/// duplicate events fires the skill at most once per interval. If the host
/// rejects the call the claim is rolled back; a call that times out keeps it.
pub struct ReactiveSkillTrigger {
    config: SkillTriggerConfig,
    gate: Arc<CooldownGate>,
}

impl ReactiveSkillTrigger {
    /// Creates a trigger backed by its own gate.
    pub fn new(config: SkillTriggerConfig) -> Self {
        let gate = Arc::new(CooldownGate::new([(config.skill.clone(), config.cooldown)]));
        Self { config, gate }
    }

    /// Creates a trigger that shares the character's gate.
    ///
    /// The gate must carry an interval for `config.skill`, otherwise the skill
    /// is never granted.
    pub fn with_gate(config: SkillTriggerConfig, gate: Arc<CooldownGate>) -> Self {
        Self { config, gate }
    }

    pub fn config(&self) -> &SkillTriggerConfig {
        &self.config
    }

    pub fn gate(&self) -> &Arc<CooldownGate> {
        &self.gate
    }
}

#[async_trait]
impl InteractionHook for ReactiveSkillTrigger {
    fn name(&self) -> &'static str {
        "reactive_skill"
    }

    fn priority(&self) -> i32 {
        -10
    }

    async fn on_interaction(
        &self,
        ctx: &HookContext<'_>,
        event: &InteractionEvent,
    ) -> HookOutcome {
        if event.beneficial {
            return HookOutcome::Skipped(SkipReason::Beneficial);
        }

        let Some(character) = ctx.query.character().await else {
            return HookOutcome::Skipped(SkipReason::StateUnavailable);
        };
        if !character.has_equipped(&self.config.required_item) {
            return HookOutcome::Skipped(SkipReason::MissingItem);
        }
        if character.mana < self.config.mana_cost {
            return HookOutcome::Skipped(SkipReason::InsufficientResource);
        }

        let skill = self.config.skill.as_str();
        let Some(reservation) = self.gate.try_acquire(skill, Instant::now()) else {
            return HookOutcome::Skipped(SkipReason::OnCooldown);
        };

        let call = ctx.query.host().use_skill(skill, Some(event.actor.as_str()));
        let error = match time::timeout(ctx.query.timeout(), call).await {
            Ok(Ok(())) => {
                info!(skill, actor = %event.actor, mana = character.mana, "reactive skill fired");
                ctx.events.publish(Event::Skill(SkillEvent::Fired {
                    skill: skill.to_string(),
                    target: event.actor.clone(),
                }));
                return HookOutcome::Fired {
                    skill: skill.to_string(),
                    target: event.actor.clone(),
                };
            }
            Ok(Err(error)) => {
                self.gate.rollback(reservation);
                error
            }
            Err(_) => {
                warn!(skill, "skill invocation unconfirmed, keeping cooldown");
                HostError::Timeout
            }
        };

        ctx.events.publish(Event::Skill(SkillEvent::Failed {
            skill: skill.to_string(),
            target: event.actor.clone(),
            error: error.to_string(),
        }));
        HookOutcome::Failed {
            skill: skill.to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, Topic};
    use crate::host::{CharacterState, InMemoryHost};
    use crate::query::SafeQuery;

    struct Fixture {
        host: Arc<InMemoryHost>,
        query: SafeQuery,
        events: EventBus,
        trigger: ReactiveSkillTrigger,
    }

    impl Fixture {
        fn new() -> Self {
            let host = Arc::new(InMemoryHost::new(CharacterState {
                name: "warden".into(),
                map: "main".into(),
                mana: 400,
                equipped: vec!["jacko".into()],
                ..CharacterState::default()
            }));
            Self {
                query: SafeQuery::new(host.clone(), Duration::from_millis(100)),
                host,
                events: EventBus::new(),
                trigger: ReactiveSkillTrigger::new(SkillTriggerConfig::default()),
            }
        }

        async fn hit(&self, event: InteractionEvent) -> HookOutcome {
            let ctx = HookContext {
                query: &self.query,
                events: &self.events,
            };
            self.trigger.on_interaction(&ctx, &event).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn harmful_hit_fires_against_attacker() {
        let fx = Fixture::new();
        let mut skill_rx = fx.events.subscribe(Topic::Skill);

        let outcome = fx.hit(InteractionEvent::harmful("goo", 12)).await;

        assert_eq!(
            outcome,
            HookOutcome::Fired {
                skill: "scare".into(),
                target: "goo".into()
            }
        );
        let log = fx.host.skill_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].target.as_deref(), Some("goo"));
        assert!(fx.trigger.gate().is_on_cooldown("scare"));
        assert!(matches!(
            skill_rx.try_recv(),
            Ok(Event::Skill(SkillEvent::Fired { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn beneficial_interaction_never_fires() {
        let fx = Fixture::new();

        let outcome = fx.hit(InteractionEvent::beneficial("priest", 200)).await;

        assert_eq!(outcome, HookOutcome::Skipped(SkipReason::Beneficial));
        assert!(fx.host.skill_log().is_empty());
        assert!(fx.trigger.gate().last_invocation("scare").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unmet_preconditions_change_nothing() {
        let fx = Fixture::new();

        fx.host.set_mana(10);
        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 1)).await,
            HookOutcome::Skipped(SkipReason::InsufficientResource)
        );

        fx.host.set_mana(400);
        fx.host.unequip("jacko");
        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 1)).await,
            HookOutcome::Skipped(SkipReason::MissingItem)
        );

        fx.host.set_available(false);
        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 1)).await,
            HookOutcome::Skipped(SkipReason::StateUnavailable)
        );

        assert!(fx.host.skill_log().is_empty());
        assert!(fx.trigger.gate().last_invocation("scare").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_invocation_restores_cooldown() {
        let fx = Fixture::new();
        fx.host.fail_skills(Some(HostError::InvalidTarget("goo".into())));

        let outcome = fx.hit(InteractionEvent::harmful("goo", 1)).await;
        assert!(matches!(outcome, HookOutcome::Failed { .. }));
        assert!(fx.trigger.gate().last_invocation("scare").is_none());

        fx.host.fail_skills(None);
        assert!(fx.hit(InteractionEvent::harmful("goo", 1)).await.is_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_invocation_keeps_cooldown() {
        let fx = Fixture::new();
        let mut skill_rx = fx.events.subscribe(Topic::Skill);
        fx.host.stall_skills(true);

        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 5)).await,
            HookOutcome::Failed {
                skill: "scare".into(),
                error: HostError::Timeout,
            }
        );
        assert!(fx.trigger.gate().is_on_cooldown("scare"));
        assert!(matches!(
            skill_rx.try_recv(),
            Ok(Event::Skill(SkillEvent::Failed { .. }))
        ));

        fx.host.stall_skills(false);
        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 5)).await,
            HookOutcome::Skipped(SkipReason::OnCooldown)
        );
        assert!(fx.host.skill_log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn events_200ms_apart_fire_once() {
        let fx = Fixture::new();

        assert!(fx.hit(InteractionEvent::harmful("goo", 5)).await.is_fired());
        time::advance(Duration::from_millis(200)).await;
        assert_eq!(
            fx.hit(InteractionEvent::harmful("goo", 5)).await,
            HookOutcome::Skipped(SkipReason::OnCooldown)
        );
        assert_eq!(fx.host.skill_log().len(), 1);

        time::advance(Duration::from_millis(800)).await;
        assert!(fx.hit(InteractionEvent::harmful("goo", 5)).await.is_fired());
        assert_eq!(fx.host.skill_log().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_duplicates_fire_once() {
        let fx = Fixture::new();
        let event = InteractionEvent::harmful("goo", 5);

        let (a, b, c) = tokio::join!(fx.hit(event.clone()), fx.hit(event.clone()), fx.hit(event));

        let fired = [a, b, c].iter().filter(|outcome| outcome.is_fired()).count();
        assert_eq!(fired, 1);
        assert_eq!(fx.host.skill_log().len(), 1);
    }
}
