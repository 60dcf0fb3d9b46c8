//! Walk creation, reads and host lifecycle actions.
//!
//! Joining lives in [`crate::domain::walk_join_service`]; this service never
//! adds participants and never confirms a walk.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AdvanceWalkRequest, CreateWalkRequest, StatusUpdate, WalkCommand, WalkDetail, WalkQuery,
    WalkRepository, WalkRepositoryError, WalkSummary,
};
use crate::domain::walks::{
    ConversationMode, DogPolicy, Pace, Terrain, TransitionOutcome, Walk, WalkDraft, WalkId,
    WalkStatus, WalkValidationError,
};
use crate::domain::{Error, Walker};

/// Capacity assigned to new walks unless configured otherwise.
pub const DEFAULT_WALK_CAPACITY: u32 = 3;

/// Settings applied when publishing walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkCreationConfig {
    /// Joiner capacity of every new walk.
    pub capacity: u32,
}

impl Default for WalkCreationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WALK_CAPACITY,
        }
    }
}

pub(crate) fn map_repository_error(error: WalkRepositoryError) -> Error {
    match error {
        WalkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("walk repository unavailable: {message}"))
        }
        WalkRepositoryError::Contention { message } => {
            Error::service_unavailable(format!("walk repository busy: {message}"))
                .with_details(json!({ "retryable": true }))
        }
        WalkRepositoryError::Query { message } | WalkRepositoryError::Conflict { message } => {
            Error::internal(format!("walk repository error: {message}"))
        }
    }
}

fn map_validation_error(error: WalkValidationError) -> Error {
    let code = match error {
        WalkValidationError::EndsBeforeStart => "ends_before_start",
        WalkValidationError::StartsInPast => "starts_in_past",
        WalkValidationError::ZeroCapacity => "zero_capacity",
        WalkValidationError::TitleTooLong { .. } => "title_too_long",
        WalkValidationError::AreaLabelTooLong { .. } => "area_label_too_long",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "code": code }))
}

fn walk_not_found(walk_id: WalkId) -> Error {
    Error::not_found(format!("walk {walk_id} was not found"))
        .with_details(json!({ "walkId": walk_id }))
}

/// Walk service implementing the walk command and query driving ports.
#[derive(Clone)]
pub struct WalkService<R> {
    walk_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    config: WalkCreationConfig,
}

impl<R> WalkService<R> {
    /// Create a new service over `walk_repo`.
    pub fn new(walk_repo: Arc<R>, clock: Arc<dyn Clock>, config: WalkCreationConfig) -> Self {
        Self {
            walk_repo,
            clock,
            config,
        }
    }
}

impl<R> WalkService<R>
where
    R: WalkRepository,
{
    async fn summarise(&self, walk: &Walk) -> Result<WalkSummary, Error> {
        let count = self
            .walk_repo
            .count_participants(&walk.id())
            .await
            .map_err(map_repository_error)?;
        Ok(WalkSummary::new(walk, count))
    }

    /// Publish the first-run sample walk hosted by `host` when no walks exist.
    ///
    /// Returns `None` when walks are already present.
    pub async fn seed_sample_walk(&self, host: Walker) -> Result<Option<WalkSummary>, Error> {
        let existing = self
            .walk_repo
            .list_walks()
            .await
            .map_err(map_repository_error)?;
        if !existing.is_empty() {
            debug!(walks = existing.len(), "sample walk skipped; walks exist");
            return Ok(None);
        }

        let start_time = self.clock.utc() + Duration::hours(1);
        let request = CreateWalkRequest {
            title: "Trial loop by the park".to_owned(),
            host,
            start_time,
            end_time: start_time + Duration::minutes(45),
            pace: Pace::Medium,
            terrain: Terrain::Mixed,
            conversation_mode: ConversationMode::Light,
            dog_policy: DogPolicy::Indifferent,
            non_smokers_only: false,
            area_label: "favourite neighbourhood".to_owned(),
        };
        self.create_walk(request).await.map(Some)
    }
}

#[async_trait]
impl<R> WalkCommand for WalkService<R>
where
    R: WalkRepository,
{
    async fn create_walk(&self, request: CreateWalkRequest) -> Result<WalkSummary, Error> {
        let now = self.clock.utc();
        let draft = WalkDraft {
            id: WalkId::random(),
            title: request.title,
            host: request.host,
            starts_at: request.start_time,
            ends_at: request.end_time,
            pace: request.pace,
            terrain: request.terrain,
            conversation_mode: request.conversation_mode,
            dog_policy: request.dog_policy,
            non_smokers_only: request.non_smokers_only,
            capacity: self.config.capacity,
            area_label: request.area_label,
            created_at: now,
        };
        let walk = Walk::schedule(draft, now).map_err(map_validation_error)?;

        self.walk_repo
            .insert_walk(&walk)
            .await
            .map_err(map_repository_error)?;

        info!(walk_id = %walk.id(), capacity = walk.capacity(), "walk scheduled");
        Ok(WalkSummary::new(&walk, 0))
    }

    async fn advance_walk(&self, request: AdvanceWalkRequest) -> Result<WalkSummary, Error> {
        let AdvanceWalkRequest { walk_id, target } = request;
        if matches!(target, WalkStatus::Scheduled | WalkStatus::Confirmed) {
            return Err(Error::invalid_request(format!(
                "status {target} cannot be requested"
            ))
            .with_details(json!({ "code": "status_not_requestable", "status": target })));
        }

        let walk = self
            .walk_repo
            .find_walk(&walk_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| walk_not_found(walk_id))?;

        let transition = match walk.status().transition(target) {
            Ok(TransitionOutcome::Unchanged(_)) => return self.summarise(&walk).await,
            Ok(TransitionOutcome::Applied(transition)) => transition,
            Err(err) => {
                return Err(Error::conflict(err.to_string()).with_details(json!({
                    "code": "illegal_transition",
                    "from": err.from,
                    "to": err.to,
                })));
            }
        };

        let update = self
            .walk_repo
            .update_walk_status(&walk_id, transition.to, transition.from)
            .await
            .map_err(map_repository_error)?;
        match update {
            StatusUpdate::Applied => {
                info!(
                    walk_id = %walk_id,
                    from = %transition.from,
                    to = %transition.to,
                    "walk status advanced"
                );
                self.summarise(&walk.with_status(transition.to)).await
            }
            StatusUpdate::Stale { actual } => Err(Error::conflict(format!(
                "walk {walk_id} changed to {actual} concurrently"
            ))
            .with_details(json!({ "code": "stale_status", "status": actual }))),
            StatusUpdate::Missing => Err(walk_not_found(walk_id)),
        }
    }
}

#[async_trait]
impl<R> WalkQuery for WalkService<R>
where
    R: WalkRepository,
{
    async fn list_walks(&self) -> Result<Vec<WalkSummary>, Error> {
        let walks = self
            .walk_repo
            .list_walks()
            .await
            .map_err(map_repository_error)?;
        let mut summaries = Vec::with_capacity(walks.len());
        for walk in &walks {
            summaries.push(self.summarise(walk).await?);
        }
        Ok(summaries)
    }

    async fn get_walk(&self, walk_id: &WalkId) -> Result<WalkDetail, Error> {
        let walk = self
            .walk_repo
            .find_walk(walk_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| walk_not_found(*walk_id))?;
        let roster = self
            .walk_repo
            .list_participants(walk_id)
            .await
            .map_err(map_repository_error)?;
        Ok(WalkDetail::new(&walk, &roster))
    }
}

#[cfg(test)]
#[path = "walk_service_tests.rs"]
mod tests;
