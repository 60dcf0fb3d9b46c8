//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`WalkRepository`], [`NotificationGateway`]) describe what the
//! domain needs from adapters. Driving ports ([`WalkJoinCommand`],
//! [`WalkCommand`], [`WalkQuery`]) describe what inbound adapters may ask of
//! the domain.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_gateway;
mod walk_command;
mod walk_join_command;
mod walk_query;
mod walk_repository;

#[cfg(test)]
pub use notification_gateway::MockNotificationGateway;
pub use notification_gateway::{NoOpNotificationGateway, NotificationError, NotificationGateway};
#[cfg(test)]
pub use walk_command::MockWalkCommand;
pub use walk_command::{AdvanceWalkRequest, CreateWalkRequest, WalkCommand};
#[cfg(test)]
pub use walk_join_command::MockWalkJoinCommand;
pub use walk_join_command::{
    JoinError, JoinOutcome, JoinOutcomeKind, JoinReceipt, JoinRequest, WalkJoinCommand,
};
#[cfg(test)]
pub use walk_query::MockWalkQuery;
pub use walk_query::{ParticipantSummary, WalkDetail, WalkQuery, WalkSummary, WalkerSummary};
#[cfg(test)]
pub use walk_repository::MockWalkRepository;
pub use walk_repository::{
    AdmissionOutcome, AdmissionRequest, FixtureWalkRepository, StatusUpdate, WalkRepository,
    WalkRepositoryError,
};
