//! Events emitted when walkers join walks.
//!
//! Events are fire-and-forget: they are built after a successful admission and
//! handed to the notification gateway wrapped in a [`NotificationEnvelope`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Walker;
use crate::domain::walks::{ParticipantCounts, PublicWalk, Walk, WalkId};

/// Application tag carried by every envelope.
pub const APP_NAME: &str = "walktalk";

/// Name and email of a walker, as shared in notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

impl From<&Walker> for Contact {
    fn from(walker: &Walker) -> Self {
        Self {
            name: walker.name().to_string(),
            email: walker.email().to_string(),
        }
    }
}

/// Payload of the `joined` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinedEvent {
    pub walk: PublicWalk,
    pub host: Contact,
    pub joiner: Contact,
    pub counts: ParticipantCounts,
}

/// Payload of the `capacity_reached` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapacityReachedEvent {
    pub walk: PublicWalk,
    pub host: Contact,
    pub last_joiner: Contact,
    /// Every participant after the filling join, in join order.
    pub participants: Vec<Contact>,
    pub counts: ParticipantCounts,
}

/// Closed set of walk notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum WalkEvent {
    Joined(JoinedEvent),
    CapacityReached(CapacityReachedEvent),
}

impl WalkEvent {
    /// Build the `joined` event for `joiner`.
    pub fn joined(walk: &Walk, joiner: &Walker, counts: ParticipantCounts) -> Self {
        Self::Joined(JoinedEvent {
            walk: walk.public_view(),
            host: Contact::from(walk.host()),
            joiner: Contact::from(joiner),
            counts,
        })
    }

    /// Build the `capacity_reached` event for the walker who filled `walk`.
    pub fn capacity_reached<'a>(
        walk: &Walk,
        last_joiner: &Walker,
        roster: impl IntoIterator<Item = &'a Walker>,
        counts: ParticipantCounts,
    ) -> Self {
        Self::CapacityReached(CapacityReachedEvent {
            walk: walk.public_view(),
            host: Contact::from(walk.host()),
            last_joiner: Contact::from(last_joiner),
            participants: roster.into_iter().map(Contact::from).collect(),
            counts,
        })
    }

    /// Wire name of the event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Joined(_) => "joined",
            Self::CapacityReached(_) => "capacity_reached",
        }
    }

    /// Walk the event concerns.
    pub fn walk_id(&self) -> WalkId {
        match self {
            Self::Joined(event) => event.walk.id,
            Self::CapacityReached(event) => event.walk.id,
        }
    }
}

/// Envelope posted to the notification webhook.
///
/// Serialises as `{"app", "event", "data", "timestamp"}` with `timestamp` in
/// Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEnvelope {
    pub app: &'static str,
    pub event: &'static str,
    pub data: WalkEvent,
    pub timestamp: i64,
}

impl NotificationEnvelope {
    /// Wrap `event` for delivery at `at`.
    pub fn new(event: WalkEvent, at: DateTime<Utc>) -> Self {
        Self {
            app: APP_NAME,
            event: event.name(),
            data: event,
            timestamp: at.timestamp_millis(),
        }
    }
}
