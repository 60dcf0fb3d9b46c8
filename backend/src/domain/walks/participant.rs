//! Participant records and occupancy counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Walker;

use super::WalkId;

/// A walker admitted to a walk.
///
/// At most one record exists per `(walk_id, walker.user_id)` pair. Records
/// are never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    walk_id: WalkId,
    walker: Walker,
    joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(walk_id: WalkId, walker: Walker, joined_at: DateTime<Utc>) -> Self {
        Self {
            walk_id,
            walker,
            joined_at,
        }
    }

    pub fn walk_id(&self) -> WalkId {
        self.walk_id
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// Occupancy snapshot: admitted joiners against capacity.
///
/// Serialises as `{"now": n, "max": m}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantCounts {
    /// Joiners admitted so far.
    pub now: u32,
    /// Walk capacity.
    pub max: u32,
}

impl ParticipantCounts {
    pub const fn new(now: u32, max: u32) -> Self {
        Self { now, max }
    }

    /// Whether no further joiners fit.
    pub const fn is_full(self) -> bool {
        self.now >= self.max
    }

    /// Seats still open.
    pub const fn remaining(self) -> u32 {
        self.max.saturating_sub(self.now)
    }
}
