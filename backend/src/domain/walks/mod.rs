//! Walk domain types.
//!
//! A walk is published by a host with a fixed joiner capacity. Participants
//! are admitted while the walk is joinable; the admission that fills the walk
//! confirms it. See [`lifecycle`] for the state machine.

use std::fmt;

mod attributes;
pub mod lifecycle;
mod participant;
mod projection;
#[cfg(test)]
mod tests;
mod validation;
mod walk;

pub use attributes::{ConversationMode, DogPolicy, Pace, ParseWalkAttributeError, Terrain};
pub use lifecycle::{
    IllegalTransition, JOINABLE_STATUSES, StatusTransition, TransitionOutcome, WalkStatus,
};
pub use participant::{Participant, ParticipantCounts};
pub use projection::PublicWalk;
pub use validation::{DEFAULT_AREA_LABEL, DEFAULT_TITLE, TEXT_FIELD_MAX};
pub use walk::{Walk, WalkDraft, WalkId};

/// Validation errors raised by walk constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkValidationError {
    EndsBeforeStart,
    StartsInPast,
    ZeroCapacity,
    TitleTooLong { max: usize },
    AreaLabelTooLong { max: usize },
}

impl fmt::Display for WalkValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndsBeforeStart => write!(f, "walk start time must be before its end time"),
            Self::StartsInPast => write!(f, "walk start time must be in the future"),
            Self::ZeroCapacity => write!(f, "walk capacity must be at least 1"),
            Self::TitleTooLong { max } => {
                write!(f, "walk title must be at most {max} characters")
            }
            Self::AreaLabelTooLong { max } => {
                write!(f, "walk area label must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for WalkValidationError {}
