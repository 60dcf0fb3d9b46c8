//! Driving port for joining walks.
//!
//! Joining is the only path that adds participants. Outcomes distinguish a new
//! admission from an idempotent repeat; rejections are typed [`JoinError`]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::walk_events::WalkEvent;
use crate::domain::walk_service::map_repository_error;
use crate::domain::walks::{Participant, ParticipantCounts, WalkId, WalkStatus};
use crate::domain::{Error, Walker};

use super::WalkRepositoryError;

/// Request to add `joiner` to a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub walk_id: WalkId,
    pub joiner: Walker,
}

/// Details of a successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReceipt {
    pub participant: Participant,
    pub counts: ParticipantCounts,
    /// Whether this admission filled the walk and confirmed it.
    pub confirmed: bool,
    /// Events emitted for this admission, in dispatch order.
    pub events: Vec<WalkEvent>,
}

/// Successful result of [`WalkJoinCommand::attempt_join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The joiner was admitted by this call.
    Joined(JoinReceipt),
    /// The joiner already held a seat; nothing changed.
    AlreadyJoined { counts: ParticipantCounts },
}

/// Wire tag for [`JoinOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcomeKind {
    Joined,
    AlreadyJoined,
}

impl JoinOutcome {
    pub fn kind(&self) -> JoinOutcomeKind {
        match self {
            Self::Joined(_) => JoinOutcomeKind::Joined,
            Self::AlreadyJoined { .. } => JoinOutcomeKind::AlreadyJoined,
        }
    }

    /// Occupancy after the call.
    pub fn counts(&self) -> ParticipantCounts {
        match self {
            Self::Joined(receipt) => receipt.counts,
            Self::AlreadyJoined { counts } => *counts,
        }
    }

    /// Whether this call confirmed the walk.
    pub fn confirmed(&self) -> bool {
        matches!(self, Self::Joined(receipt) if receipt.confirmed)
    }
}

/// Reasons a join is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("walk {walk_id} was not found")]
    WalkNotFound { walk_id: WalkId },
    #[error("walk {walk_id} is {status} and no longer accepts participants")]
    WalkNotJoinable { walk_id: WalkId, status: WalkStatus },
    #[error("walk {walk_id} is full ({}/{})", .counts.now, .counts.max)]
    CapacityExceeded {
        walk_id: WalkId,
        counts: ParticipantCounts,
    },
    #[error("join did not settle after {attempts} attempts")]
    Contention { attempts: u32 },
    #[error(transparent)]
    Repository(#[from] WalkRepositoryError),
}

impl From<JoinError> for Error {
    fn from(value: JoinError) -> Self {
        let message = value.to_string();
        match value {
            JoinError::WalkNotFound { walk_id } => {
                Error::not_found(message).with_details(json!({ "walkId": walk_id }))
            }
            JoinError::WalkNotJoinable { walk_id, status } => {
                Error::conflict(message).with_details(json!({
                    "code": "walk_not_joinable",
                    "walkId": walk_id,
                    "status": status,
                }))
            }
            JoinError::CapacityExceeded { walk_id, counts } => {
                Error::conflict(message).with_details(json!({
                    "code": "capacity_exceeded",
                    "walkId": walk_id,
                    "counts": counts,
                }))
            }
            JoinError::Contention { attempts } => {
                Error::service_unavailable(message).with_details(json!({
                    "code": "contention",
                    "attempts": attempts,
                    "retryable": true,
                }))
            }
            JoinError::Repository(err) => map_repository_error(err),
        }
    }
}

/// Driving port for walk admissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalkJoinCommand: Send + Sync {
    /// Admit `request.joiner` to `request.walk_id` if the walk is joinable and
    /// has a free seat.
    async fn attempt_join(&self, request: JoinRequest) -> Result<JoinOutcome, JoinError>;
}
