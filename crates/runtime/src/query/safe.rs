//! Failure-absorbing access to the game host.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::api::HostResult;
use crate::host::{CharacterState, EntityRecord, GameHost, InventorySnapshot};

/// Wraps [`GameHost`] lookups so that errors, timeouts and malformed data
/// collapse to a documented default instead of reaching the caller.
///
/// | lookup | default |
/// |---|---|
/// | entity / character / inventory | `None` |
/// | distance | `None` |
/// | motion | `false` (stationary) |
#[derive(Clone)]
pub struct SafeQuery {
    host: Arc<dyn GameHost>,
    timeout: Duration,
}

impl SafeQuery {
    pub fn new(host: Arc<dyn GameHost>, timeout: Duration) -> Self {
        Self { host, timeout }
    }

    /// The wrapped host, for calls that are not queries (skills, status).
    pub fn host(&self) -> &Arc<dyn GameHost> {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Awaits `call` within the query timeout.
    ///
    /// Returns `None` if the call failed or did not finish in time.
    pub async fn attempt<T, F>(&self, label: &'static str, call: F) -> Option<T>
    where
        F: Future<Output = HostResult<T>>,
    {
        match time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                debug!(query = label, %error, "host query failed, using default");
                None
            }
            Err(_) => {
                debug!(
                    query = label,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "host query timed out, using default"
                );
                None
            }
        }
    }

    /// Whether the character is moving by itself or through a movement driver.
    pub async fn is_moving(&self) -> bool {
        self.attempt("motion", self.host.motion())
            .await
            .is_some_and(|motion| motion.is_moving())
    }

    pub async fn character(&self) -> Option<CharacterState> {
        self.attempt("character", self.host.character()).await
    }

    pub async fn find_player(&self, name: &str) -> Option<EntityRecord> {
        self.attempt("find_player", self.host.find_player(name))
            .await
            .flatten()
    }

    /// Distance to `target`; NaN, infinite or negative values count as failure.
    pub async fn distance_to(&self, target: &EntityRecord) -> Option<f64> {
        let distance = self
            .attempt("distance_to", self.host.distance_to(target))
            .await?;
        if distance.is_finite() && distance >= 0.0 {
            Some(distance)
        } else {
            debug!(entity = %target.name, distance, "malformed distance, using default");
            None
        }
    }

    pub async fn inventory(&self) -> Option<InventorySnapshot> {
        self.attempt("inventory", self.host.inventory()).await
    }
}
