//! Per-action minimum spacing between invocations.
//!
//! Each configured action is either READY (never invoked, or its interval has
//! elapsed) or COOLING. Entering COOLING only happens by recording an
//! invocation; leaving it is evaluated lazily against the clock on every
//! query, so no timers are involved.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{trace, warn};

/// Proof that an invocation slot was taken by [`CooldownGate::try_acquire`].
///
/// Hand it back to [`CooldownGate::rollback`] when the action could not be
/// performed after all.
#[derive(Debug)]
#[must_use = "a reservation should be kept or rolled back"]
pub struct CooldownReservation {
    action: String,
    at: Instant,
    previous: Option<Instant>,
}

impl CooldownReservation {
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn at(&self) -> Instant {
        self.at
    }
}

/// Last-invocation records for one character.
///
/// Intervals are fixed at construction. Action names without an interval are
/// treated as misconfigured: they report as cooling and can never be acquired.
#[derive(Debug)]
pub struct CooldownGate {
    intervals: HashMap<String, Duration>,
    records: Mutex<HashMap<String, Instant>>,
}

impl CooldownGate {
    pub fn new<I, S>(intervals: I) -> Self
    where
        I: IntoIterator<Item = (S, Duration)>,
        S: Into<String>,
    {
        Self {
            intervals: intervals
                .into_iter()
                .map(|(name, interval)| (name.into(), interval))
                .collect(),
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Configured interval for `action`, if any.
    pub fn interval(&self, action: &str) -> Option<Duration> {
        self.intervals.get(action).copied()
    }

    pub fn last_invocation(&self, action: &str) -> Option<Instant> {
        self.records().get(action).copied()
    }

    pub fn is_on_cooldown(&self, action: &str) -> bool {
        self.is_on_cooldown_at(action, Instant::now())
    }

    pub fn is_on_cooldown_at(&self, action: &str, now: Instant) -> bool {
        let Some(interval) = self.interval(action) else {
            return true;
        };
        let last = self.records().get(action).copied();
        cooling(last, interval, now)
    }

    /// Time left until `action` is READY; zero when it already is.
    pub fn remaining(&self, action: &str, now: Instant) -> Option<Duration> {
        let interval = self.interval(action)?;
        let remaining = match self.records().get(action) {
            Some(last) => interval.saturating_sub(now.saturating_duration_since(*last)),
            None => Duration::ZERO,
        };
        Some(remaining)
    }

    /// Overwrites the record for `action` with `at`.
    pub fn record_invocation(&self, action: &str, at: Instant) {
        if self.interval(action).is_none() {
            warn!(action, "ignoring invocation of action without a cooldown interval");
            return;
        }
        self.records().insert(action.to_string(), at);
    }

    /// Checks READY and records `now` in one step.
    ///
    /// Concurrent callers for the same action cannot both succeed within the
    /// interval.
    pub fn try_acquire(&self, action: &str, now: Instant) -> Option<CooldownReservation> {
        let interval = self.interval(action)?;
        let mut records = self.records();
        let previous = records.get(action).copied();
        if cooling(previous, interval, now) {
            trace!(action, "cooldown active");
            return None;
        }
        records.insert(action.to_string(), now);
        Some(CooldownReservation {
            action: action.to_string(),
            at: now,
            previous,
        })
    }

    /// Restores the record that `reservation` replaced.
    ///
    /// Does nothing if the record was overwritten again in the meantime.
    pub fn rollback(&self, reservation: CooldownReservation) {
        let mut records = self.records();
        if records.get(&reservation.action) != Some(&reservation.at) {
            return;
        }
        match reservation.previous {
            Some(previous) => {
                records.insert(reservation.action, previous);
            }
            None => {
                records.remove(&reservation.action);
            }
        }
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cooling(last: Option<Instant>, interval: Duration, now: Instant) -> bool {
    last.is_some_and(|last| now.saturating_duration_since(last) < interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    fn gate() -> CooldownGate {
        CooldownGate::new([("scare", SECOND), ("taunt", 3 * SECOND)])
    }

    #[test]
    fn never_invoked_is_ready() {
        let gate = gate();
        assert!(!gate.is_on_cooldown_at("scare", Instant::now()));
        assert_eq!(gate.remaining("scare", Instant::now()), Some(Duration::ZERO));
    }

    #[test]
    fn cooling_window_is_half_open() {
        let gate = gate();
        let t0 = Instant::now();
        gate.record_invocation("scare", t0);

        assert!(gate.is_on_cooldown_at("scare", t0));
        assert!(gate.is_on_cooldown_at("scare", t0 + Duration::from_millis(999)));
        assert!(!gate.is_on_cooldown_at("scare", t0 + SECOND));
        assert!(!gate.is_on_cooldown_at("scare", t0 + 5 * SECOND));
        assert_eq!(
            gate.remaining("scare", t0 + Duration::from_millis(400)),
            Some(Duration::from_millis(600))
        );
    }

    #[test]
    fn actions_are_tracked_independently() {
        let gate = gate();
        let t0 = Instant::now();
        gate.record_invocation("taunt", t0);

        assert!(gate.is_on_cooldown_at("taunt", t0 + 2 * SECOND));
        assert!(!gate.is_on_cooldown_at("scare", t0));
    }

    #[test]
    fn unknown_action_is_never_ready() {
        let gate = gate();
        let now = Instant::now();

        assert!(gate.is_on_cooldown_at("blink", now));
        assert!(gate.try_acquire("blink", now).is_none());
        assert!(gate.remaining("blink", now).is_none());

        gate.record_invocation("blink", now);
        assert!(gate.last_invocation("blink").is_none());
    }

    #[test]
    fn acquire_blocks_until_interval_elapses() {
        let gate = gate();
        let t0 = Instant::now();

        let reservation = gate.try_acquire("scare", t0);
        assert!(reservation.is_some());
        assert!(gate.try_acquire("scare", t0 + Duration::from_millis(200)).is_none());
        assert!(gate.try_acquire("scare", t0 + SECOND).is_some());
    }

    #[test]
    fn rollback_restores_previous_record() {
        let gate = gate();
        let t0 = Instant::now();
        gate.record_invocation("scare", t0);

        let later = t0 + 2 * SECOND;
        let reservation = gate.try_acquire("scare", later).expect("ready again");
        assert_eq!(gate.last_invocation("scare"), Some(later));

        gate.rollback(reservation);
        assert_eq!(gate.last_invocation("scare"), Some(t0));

        let first = gate.try_acquire("taunt", t0).expect("never used");
        gate.rollback(first);
        assert!(gate.last_invocation("taunt").is_none());
    }

    #[test]
    fn stale_rollback_keeps_newer_record() {
        let gate = gate();
        let t0 = Instant::now();
        let reservation = gate.try_acquire("scare", t0).expect("ready");
        let newer = t0 + 2 * SECOND;
        gate.record_invocation("scare", newer);

        gate.rollback(reservation);
        assert_eq!(gate.last_invocation("scare"), Some(newer));
    }
}
