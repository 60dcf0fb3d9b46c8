//! Driving port for walk creation and host lifecycle actions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::walks::{ConversationMode, DogPolicy, Pace, Terrain, WalkId, WalkStatus};
use crate::domain::{Error, Walker};

use super::WalkSummary;

/// Request to publish a new walk.
///
/// Capacity is not part of the request; it comes from server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalkRequest {
    #[serde(default)]
    pub title: String,
    pub host: Walker,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pace: Pace,
    pub terrain: Terrain,
    pub conversation_mode: ConversationMode,
    pub dog_policy: DogPolicy,
    #[serde(default)]
    pub non_smokers_only: bool,
    #[serde(default)]
    pub area_label: String,
}

/// Request to move a walk along its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceWalkRequest {
    pub walk_id: WalkId,
    /// One of `canceled`, `started` or `done`.
    pub target: WalkStatus,
}

/// Driving port for walk write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalkCommand: Send + Sync {
    /// Validate and publish a walk in the `scheduled` state.
    async fn create_walk(&self, request: CreateWalkRequest) -> Result<WalkSummary, Error>;

    /// Apply a host or scheduler transition.
    ///
    /// `confirmed` cannot be requested; it is only reached by filling a walk.
    async fn advance_walk(&self, request: AdvanceWalkRequest) -> Result<WalkSummary, Error>;
}
