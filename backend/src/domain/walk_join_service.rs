//! Capacity and confirmation engine.
//!
//! [`WalkJoinService`] is the only writer of participant records. Each join
//! is screened against a snapshot read, then settled by the repository's
//! atomic admission primitive, whose answer is authoritative. The admission
//! that fills a walk is the only one that observes `confirmed`, so each walk
//! emits at most one `capacity_reached` event.
//!
//! Notifications are delivered after the admission commits, concurrently and
//! each under a timeout. Delivery failures are logged and never undo a join.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AdmissionOutcome, AdmissionRequest, JoinError, JoinOutcome, JoinReceipt, JoinRequest,
    NotificationGateway, WalkJoinCommand, WalkRepository,
};
use crate::domain::walk_events::{NotificationEnvelope, WalkEvent};
use crate::domain::walks::{Participant, ParticipantCounts, Walk, WalkId};

/// Tuning for admissions and notification delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkJoinConfig {
    /// Admission attempts before reporting contention. At least 1.
    pub max_attempts: u32,
    /// Base delay between contended attempts.
    pub retry_backoff: Duration,
    /// Upper bound on a single notification delivery.
    pub notification_timeout: Duration,
}

impl Default for WalkJoinConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(25),
            notification_timeout: Duration::from_secs(5),
        }
    }
}

/// Async sleeping abstraction for retry delays.
#[async_trait]
pub trait RetrySleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Retry backoff jitter abstraction.
pub trait BackoffJitter: Send + Sync {
    /// Delay before retry number `attempt` (1-based), derived from `base`.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use walktalk::domain::BackoffJitter;
    ///
    /// struct Linear;
    /// impl BackoffJitter for Linear {
    ///     fn jittered_delay(&self, base: Duration, attempt: u32) -> Duration {
    ///         base * attempt
    ///     }
    /// }
    /// assert_eq!(Linear.jittered_delay(Duration::from_millis(10), 3), Duration::from_millis(30));
    /// ```
    fn jittered_delay(&self, base: Duration, attempt: u32) -> Duration;
}

/// Tokio-based sleeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RetrySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Exponential backoff with up to 50% random extra delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl BackoffJitter for RandomJitter {
    fn jittered_delay(&self, base: Duration, attempt: u32) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let exponent = attempt.saturating_sub(1).min(16);
        let scaled = base_ms.saturating_mul(1_u64 << exponent);
        let extra = rand::thread_rng().gen_range(0..=scaled / 2);
        Duration::from_millis(scaled.saturating_add(extra))
    }
}

/// Runtime helpers used by the retry loop.
#[derive(Clone)]
pub struct JoinRetryRuntime {
    pub sleeper: Arc<dyn RetrySleeper>,
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for JoinRetryRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
        }
    }
}

/// Join engine implementing the [`WalkJoinCommand`] driving port.
#[derive(Clone)]
pub struct WalkJoinService<R> {
    walk_repo: Arc<R>,
    gateway: Arc<dyn NotificationGateway>,
    clock: Arc<dyn Clock>,
    runtime: JoinRetryRuntime,
    config: WalkJoinConfig,
}

impl<R> WalkJoinService<R> {
    /// Create a join engine with the default retry runtime.
    pub fn new(
        walk_repo: Arc<R>,
        gateway: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
        config: WalkJoinConfig,
    ) -> Self {
        Self::with_runtime(walk_repo, gateway, clock, config, JoinRetryRuntime::default())
    }

    /// Create a join engine with explicit sleeping and jitter strategies.
    pub fn with_runtime(
        walk_repo: Arc<R>,
        gateway: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
        config: WalkJoinConfig,
        runtime: JoinRetryRuntime,
    ) -> Self {
        Self {
            walk_repo,
            gateway,
            clock,
            runtime,
            config,
        }
    }
}

impl<R> WalkJoinService<R>
where
    R: WalkRepository,
{
    async fn load_walk(&self, walk_id: WalkId) -> Result<Walk, JoinError> {
        self.walk_repo
            .find_walk(&walk_id)
            .await?
            .ok_or(JoinError::WalkNotFound { walk_id })
    }

    async fn admit_with_retry(
        &self,
        participant: &Participant,
        capacity: u32,
    ) -> Result<AdmissionOutcome, JoinError> {
        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let request = AdmissionRequest::new(participant.clone(), capacity);
            match self.walk_repo.admit_participant(request).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if err.is_retryable() => {
                    warn!(
                        walk_id = %participant.walk_id(),
                        attempt,
                        max_attempts,
                        error = %err,
                        "admission contended"
                    );
                    if attempt < max_attempts {
                        let delay = self
                            .runtime
                            .jitter
                            .jittered_delay(self.config.retry_backoff, attempt);
                        self.runtime.sleeper.sleep(delay).await;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(JoinError::Contention {
            attempts: max_attempts,
        })
    }

    /// Deliver every event concurrently, each under its own timeout, so a
    /// join waits at most one `notification_timeout` for delivery.
    async fn dispatch(&self, events: &[WalkEvent]) {
        let deliveries = events.iter().map(|event| self.deliver(event));
        join_all(deliveries).await;
    }

    async fn deliver(&self, event: &WalkEvent) {
        let envelope = NotificationEnvelope::new(event.clone(), self.clock.utc());
        let delivery = tokio::time::timeout(
            self.config.notification_timeout,
            self.gateway.send(&envelope),
        )
        .await;
        match delivery {
            Ok(Ok(())) => debug!(
                walk_id = %event.walk_id(),
                event = event.name(),
                "notification delivered"
            ),
            Ok(Err(err)) => warn!(
                walk_id = %event.walk_id(),
                event = event.name(),
                error = %err,
                "notification delivery failed"
            ),
            Err(_) => warn!(
                walk_id = %event.walk_id(),
                event = event.name(),
                timeout_ms = self.config.notification_timeout.as_millis(),
                "notification delivery timed out"
            ),
        }
    }
}

#[async_trait]
impl<R> WalkJoinCommand for WalkJoinService<R>
where
    R: WalkRepository,
{
    async fn attempt_join(&self, request: JoinRequest) -> Result<JoinOutcome, JoinError> {
        let JoinRequest { walk_id, joiner } = request;
        let walk = self.load_walk(walk_id).await?;
        if !walk.is_joinable() {
            return Err(JoinError::WalkNotJoinable {
                walk_id,
                status: walk.status(),
            });
        }

        let count = self.walk_repo.count_participants(&walk_id).await?;
        let counts = ParticipantCounts::new(count, walk.capacity());
        if self
            .walk_repo
            .find_participant(&walk_id, joiner.user_id())
            .await?
            .is_some()
        {
            debug!(walk_id = %walk_id, "walker already joined");
            return Ok(JoinOutcome::AlreadyJoined { counts });
        }
        if counts.is_full() {
            return Err(JoinError::CapacityExceeded { walk_id, counts });
        }

        let participant = Participant::new(walk_id, joiner, self.clock.utc());
        let outcome = self
            .admit_with_retry(&participant, walk.capacity())
            .await?;

        let (counts, roster, confirmed) = match outcome {
            AdmissionOutcome::Inserted {
                counts,
                roster,
                confirmed,
            } => (counts, roster, confirmed),
            AdmissionOutcome::AlreadyPresent { counts } => {
                return Ok(JoinOutcome::AlreadyJoined { counts });
            }
            AdmissionOutcome::Full { counts } => {
                return Err(JoinError::CapacityExceeded { walk_id, counts });
            }
            AdmissionOutcome::NotJoinable { status } => {
                return Err(JoinError::WalkNotJoinable { walk_id, status });
            }
            AdmissionOutcome::WalkMissing => return Err(JoinError::WalkNotFound { walk_id }),
        };

        info!(
            walk_id = %walk_id,
            now = counts.now,
            max = counts.max,
            confirmed,
            "walker joined"
        );

        let mut events = vec![WalkEvent::joined(&walk, participant.walker(), counts)];
        if confirmed {
            info!(walk_id = %walk_id, "walk confirmed");
            events.push(WalkEvent::capacity_reached(
                &walk,
                participant.walker(),
                roster.iter().map(Participant::walker),
                counts,
            ));
        }
        self.dispatch(&events).await;

        Ok(JoinOutcome::Joined(JoinReceipt {
            participant,
            counts,
            confirmed,
            events,
        }))
    }
}

#[cfg(test)]
#[path = "walk_join_service_tests.rs"]
mod tests;
