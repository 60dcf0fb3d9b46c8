//! Driving port for walk reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::walks::{
    ConversationMode, DogPolicy, Pace, Participant, ParticipantCounts, Terrain, Walk, WalkId,
    WalkStatus,
};
use crate::domain::{Error, UserId, Walker};

/// Public identity of a host or participant. Email stays private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkerSummary {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub name: String,
}

impl From<&Walker> for WalkerSummary {
    fn from(walker: &Walker) -> Self {
        Self {
            user_id: walker.user_id().clone(),
            name: walker.name().to_string(),
        }
    }
}

/// Walk listing entry with occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: WalkId,
    pub title: String,
    pub host: WalkerSummary,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pace: Pace,
    pub terrain: Terrain,
    pub conversation_mode: ConversationMode,
    pub dog_policy: DogPolicy,
    pub non_smokers_only: bool,
    pub area_label: String,
    pub status: WalkStatus,
    pub counts: ParticipantCounts,
}

impl WalkSummary {
    /// Summarise `walk` with `participants` recorded joiners.
    pub fn new(walk: &Walk, participants: u32) -> Self {
        Self {
            id: walk.id(),
            title: walk.title().to_owned(),
            host: WalkerSummary::from(walk.host()),
            start_time: walk.starts_at(),
            end_time: walk.ends_at(),
            pace: walk.pace(),
            terrain: walk.terrain(),
            conversation_mode: walk.conversation_mode(),
            dog_policy: walk.dog_policy(),
            non_smokers_only: walk.non_smokers_only(),
            area_label: walk.area_label().to_owned(),
            status: walk.status(),
            counts: ParticipantCounts::new(participants, walk.capacity()),
        }
    }
}

/// Roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<&Participant> for ParticipantSummary {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.walker().user_id().clone(),
            name: participant.walker().name().to_string(),
            joined_at: participant.joined_at(),
        }
    }
}

/// A walk with its roster in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkDetail {
    pub walk: WalkSummary,
    pub participants: Vec<ParticipantSummary>,
}

impl WalkDetail {
    pub fn new(walk: &Walk, roster: &[Participant]) -> Self {
        let joined = u32::try_from(roster.len()).unwrap_or(u32::MAX);
        Self {
            walk: WalkSummary::new(walk, joined),
            participants: roster.iter().map(ParticipantSummary::from).collect(),
        }
    }
}

/// Driving port for walk read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalkQuery: Send + Sync {
    /// Every walk ordered by start time, with occupancy.
    async fn list_walks(&self) -> Result<Vec<WalkSummary>, Error>;

    /// One walk with its roster.
    async fn get_walk(&self, walk_id: &WalkId) -> Result<WalkDetail, Error>;
}
