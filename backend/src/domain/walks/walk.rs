//! Walk entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Walker;

use super::{
    ConversationMode, DogPolicy, Pace, PublicWalk, Terrain, WalkStatus, WalkValidationError,
};

/// Stable walk identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalkId(Uuid);

impl WalkId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WalkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WalkId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// Input payload for [`Walk::new`] and [`Walk::schedule`].
///
/// Blank `title` and `area_label` values are replaced with defaults during
/// validation.
#[derive(Debug, Clone)]
pub struct WalkDraft {
    pub id: WalkId,
    pub title: String,
    pub host: Walker,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub pace: Pace,
    pub terrain: Terrain,
    pub conversation_mode: ConversationMode,
    pub dog_policy: DogPolicy,
    pub non_smokers_only: bool,
    pub capacity: u32,
    pub area_label: String,
    pub created_at: DateTime<Utc>,
}

/// A published walk.
///
/// ## Invariants
/// - `starts_at < ends_at`.
/// - `capacity >= 1`.
/// - `title` and `area_label` are non-blank.
///
/// The host is not counted against capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    pub(super) id: WalkId,
    pub(super) title: String,
    pub(super) host: Walker,
    pub(super) starts_at: DateTime<Utc>,
    pub(super) ends_at: DateTime<Utc>,
    pub(super) pace: Pace,
    pub(super) terrain: Terrain,
    pub(super) conversation_mode: ConversationMode,
    pub(super) dog_policy: DogPolicy,
    pub(super) non_smokers_only: bool,
    pub(super) capacity: u32,
    pub(super) area_label: String,
    pub(super) status: WalkStatus,
    pub(super) created_at: DateTime<Utc>,
}

impl Walk {
    /// Validate a draft into a `scheduled` walk without checking the clock.
    pub fn new(draft: WalkDraft) -> Result<Self, WalkValidationError> {
        Self::try_from(draft)
    }

    /// Validate a draft for publication at `now`; the start must lie in the
    /// future.
    pub fn schedule(draft: WalkDraft, now: DateTime<Utc>) -> Result<Self, WalkValidationError> {
        if draft.starts_at <= now {
            return Err(WalkValidationError::StartsInPast);
        }
        Self::new(draft)
    }

    /// Rebuild a stored walk with its persisted status.
    pub fn restore(draft: WalkDraft, status: WalkStatus) -> Result<Self, WalkValidationError> {
        let mut walk = Self::new(draft)?;
        walk.status = status;
        Ok(walk)
    }

    pub fn id(&self) -> WalkId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn host(&self) -> &Walker {
        &self.host
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn conversation_mode(&self) -> ConversationMode {
        self.conversation_mode
    }

    pub fn dog_policy(&self) -> DogPolicy {
        self.dog_policy
    }

    pub fn non_smokers_only(&self) -> bool {
        self.non_smokers_only
    }

    /// Maximum number of joiners, excluding the host.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn area_label(&self) -> &str {
        self.area_label.as_str()
    }

    pub fn status(&self) -> WalkStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether new participants may currently be admitted.
    pub fn is_joinable(&self) -> bool {
        self.status.is_joinable()
    }

    /// Copy of this walk carrying a different status.
    pub fn with_status(mut self, status: WalkStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Overwrite the stored status in place.
    ///
    /// Callers validate the move through the lifecycle first.
    pub fn set_status(&mut self, status: WalkStatus) {
        self.status = status;
    }

    /// Public projection shared in notifications.
    ///
    /// Excludes host identity and walker preferences.
    pub fn public_view(&self) -> PublicWalk {
        PublicWalk {
            id: self.id,
            title: self.title.clone(),
            start_time: self.starts_at,
            end_time: self.ends_at,
            area_label: self.area_label.clone(),
            capacity: self.capacity,
        }
    }
}
