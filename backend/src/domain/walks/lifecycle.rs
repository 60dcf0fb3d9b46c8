//! Walk lifecycle state machine.
//!
//! ```text
//! scheduled ──fill──▶ confirmed ──▶ started ──▶ done
//!     │                   │
//!     └────▶ canceled ◀───┘
//! ```
//!
//! Transitions only move forward. Re-entering the current state is a no-op so
//! repeated confirmation signals never fail. Joins are admitted only while the
//! walk is `scheduled` or `confirmed`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParseWalkAttributeError;

/// Lifecycle state of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WalkStatus {
    /// Published and accepting joiners.
    Scheduled,
    /// Capacity reached at least once; the group is set.
    Confirmed,
    /// The walk is under way.
    Started,
    /// The walk finished.
    Done,
    /// The host called the walk off.
    Canceled,
}

/// Statuses that admit new participants.
pub const JOINABLE_STATUSES: [WalkStatus; 2] = [WalkStatus::Scheduled, WalkStatus::Confirmed];

/// Rejected lifecycle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("walk cannot move from {from} to {to}")]
pub struct IllegalTransition {
    /// Current status.
    pub from: WalkStatus,
    /// Requested status.
    pub to: WalkStatus,
}

/// A concrete `from -> to` edge in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status the walk must currently hold.
    pub from: WalkStatus,
    /// Status the walk moves to.
    pub to: WalkStatus,
}

/// Result of applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status changes along this edge.
    Applied(StatusTransition),
    /// The walk already holds the requested status.
    Unchanged(WalkStatus),
}

impl WalkStatus {
    /// Initial state for every new walk.
    pub const INITIAL: Self = Self::Scheduled;

    /// Whether joins are admitted in this state.
    pub const fn is_joinable(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }

    /// Whether no further transitions exist.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }

    /// Edge taken by the admission that fills the walk.
    pub const fn fill_transition() -> StatusTransition {
        StatusTransition {
            from: Self::Scheduled,
            to: Self::Confirmed,
        }
    }

    const fn permits(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::Confirmed)
                | (Self::Scheduled, Self::Canceled)
                | (Self::Confirmed, Self::Canceled)
                | (Self::Confirmed, Self::Started)
                | (Self::Started, Self::Done)
        )
    }

    /// Validate a move to `target`.
    ///
    /// # Examples
    /// ```
    /// use walktalk::domain::{TransitionOutcome, WalkStatus};
    ///
    /// let outcome = WalkStatus::Confirmed.transition(WalkStatus::Confirmed);
    /// assert_eq!(outcome, Ok(TransitionOutcome::Unchanged(WalkStatus::Confirmed)));
    /// assert!(WalkStatus::Confirmed.transition(WalkStatus::Scheduled).is_err());
    /// ```
    pub fn transition(self, target: Self) -> Result<TransitionOutcome, IllegalTransition> {
        if self == target {
            return Ok(TransitionOutcome::Unchanged(self));
        }
        if self.permits(target) {
            Ok(TransitionOutcome::Applied(StatusTransition {
                from: self,
                to: target,
            }))
        } else {
            Err(IllegalTransition {
                from: self,
                to: target,
            })
        }
    }

    /// Lowercase wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Started => "started",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for WalkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalkStatus {
    type Err = ParseWalkAttributeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "started" => Ok(Self::Started),
            "done" => Ok(Self::Done),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseWalkAttributeError {
                attribute: "status",
                value: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use WalkStatus::{Canceled, Confirmed, Done, Scheduled, Started};

    #[rstest]
    #[case(Scheduled, Confirmed)]
    #[case(Scheduled, Canceled)]
    #[case(Confirmed, Canceled)]
    #[case(Confirmed, Started)]
    #[case(Started, Done)]
    fn forward_edges_apply(#[case] from: WalkStatus, #[case] to: WalkStatus) {
        assert_eq!(
            from.transition(to),
            Ok(TransitionOutcome::Applied(StatusTransition { from, to }))
        );
    }

    #[rstest]
    #[case(Confirmed, Scheduled)]
    #[case(Started, Confirmed)]
    #[case(Done, Started)]
    #[case(Canceled, Scheduled)]
    #[case(Scheduled, Started)]
    #[case(Scheduled, Done)]
    #[case(Started, Canceled)]
    #[case(Done, Canceled)]
    fn backward_and_skipping_edges_are_rejected(#[case] from: WalkStatus, #[case] to: WalkStatus) {
        assert_eq!(from.transition(to), Err(IllegalTransition { from, to }));
    }

    #[rstest]
    fn reconfirming_is_a_no_op() {
        assert_eq!(
            Confirmed.transition(Confirmed),
            Ok(TransitionOutcome::Unchanged(Confirmed))
        );
    }

    #[rstest]
    #[case(Scheduled, true)]
    #[case(Confirmed, true)]
    #[case(Started, false)]
    #[case(Done, false)]
    #[case(Canceled, false)]
    fn joinability_follows_status(#[case] status: WalkStatus, #[case] joinable: bool) {
        assert_eq!(status.is_joinable(), joinable);
        assert_eq!(JOINABLE_STATUSES.contains(&status), joinable);
    }

    #[rstest]
    fn terminal_states_have_no_exits() {
        for terminal in [Done, Canceled] {
            assert!(terminal.is_terminal());
            for target in [Scheduled, Confirmed, Started] {
                assert!(terminal.transition(target).is_err());
            }
        }
    }

    #[rstest]
    fn fill_transition_latches_confirmation() {
        assert_eq!(
            WalkStatus::fill_transition(),
            StatusTransition {
                from: Scheduled,
                to: Confirmed
            }
        );
        assert_eq!(WalkStatus::INITIAL, Scheduled);
    }

    #[rstest]
    fn status_text_round_trips() {
        for status in [Scheduled, Confirmed, Started, Done, Canceled] {
            assert_eq!(status.as_str().parse::<WalkStatus>(), Ok(status));
        }
        assert!("pending".parse::<WalkStatus>().is_err());
    }
}
