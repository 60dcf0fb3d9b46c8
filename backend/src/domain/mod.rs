//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed walk and identity entities plus the services
//! that drive them. Adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Walker: identity of hosts and joiners.
//! - Walk, WalkStatus, Participant: the walk aggregate and its lifecycle.
//! - WalkJoinService: the capacity and confirmation engine.
//! - WalkService: walk creation, reads and host lifecycle actions.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod walk_events;
pub mod walk_join_service;
pub mod walk_service;
pub mod walks;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, User, UserId, UserValidationError, Walker,
};
pub use self::walk_events::{Contact, NotificationEnvelope, WalkEvent};
pub use self::walk_join_service::{
    BackoffJitter, JoinRetryRuntime, RandomJitter, RetrySleeper, TokioSleeper, WalkJoinConfig,
    WalkJoinService,
};
pub use self::walk_service::{DEFAULT_WALK_CAPACITY, WalkCreationConfig, WalkService};
pub use self::walks::{
    ConversationMode, DogPolicy, IllegalTransition, Pace, Participant, ParticipantCounts,
    PublicWalk, StatusTransition, Terrain, TransitionOutcome, Walk, WalkDraft, WalkId, WalkStatus,
    WalkValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use walktalk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::conflict("walk is full"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
