//! Port for walk and participant persistence.
//!
//! The central operation is [`WalkRepository::admit_participant`], which
//! performs the check-and-insert of a join as one isolated unit of work. Every
//! adapter must guarantee that concurrent admissions for the same walk never
//! exceed its capacity and never record the same walker twice.

use async_trait::async_trait;

use crate::domain::walks::{
    JOINABLE_STATUSES, Participant, ParticipantCounts, StatusTransition, Walk, WalkId, WalkStatus,
};
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by walk repository adapters.
    pub enum WalkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "walk repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "walk repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } =>
            "walk repository write conflicted: {message}",
        /// The unit of work lost a race and may be retried.
        Contention { message: String } =>
            "walk repository contention: {message}",
    }
}

impl WalkRepositoryError {
    /// Whether repeating the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention { .. })
    }
}

/// Everything an adapter needs to admit one participant atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    /// Record to insert.
    pub participant: Participant,
    /// Capacity the walk was published with.
    pub capacity: u32,
    /// Statuses under which the insert may proceed.
    pub joinable: &'static [WalkStatus],
    /// Transition to apply when the insert fills the walk.
    pub fill: StatusTransition,
}

impl AdmissionRequest {
    /// Build a request using the standard joinable set and fill transition.
    pub fn new(participant: Participant, capacity: u32) -> Self {
        Self {
            participant,
            capacity,
            joinable: &JOINABLE_STATUSES,
            fill: WalkStatus::fill_transition(),
        }
    }

    /// Walk being joined.
    pub fn walk_id(&self) -> WalkId {
        self.participant.walk_id()
    }

    /// Whether `status` admits this request.
    pub fn admits(&self, status: WalkStatus) -> bool {
        self.joinable.contains(&status)
    }

    /// Status the walk should hold after an insert that leaves `count`
    /// participants, given its `current` status. `None` means unchanged.
    pub fn status_after_insert(&self, current: WalkStatus, count: u32) -> Option<WalkStatus> {
        (count >= self.capacity && current == self.fill.from).then_some(self.fill.to)
    }
}

/// Result of [`WalkRepository::admit_participant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The participant was recorded.
    Inserted {
        counts: ParticipantCounts,
        /// Participants after the insert, in join order.
        roster: Vec<Participant>,
        /// True only for the insert that filled the walk and applied the fill
        /// transition.
        confirmed: bool,
    },
    /// The walker already holds a record for this walk.
    AlreadyPresent { counts: ParticipantCounts },
    /// No seats remained.
    Full { counts: ParticipantCounts },
    /// The walk's status no longer admits joins.
    NotJoinable { status: WalkStatus },
    /// The walk does not exist.
    WalkMissing,
}

/// Result of a conditional status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The walk held the expected status and now holds the new one.
    Applied,
    /// The walk held `actual` instead; nothing was written.
    Stale { actual: WalkStatus },
    /// The walk does not exist.
    Missing,
}

/// Port for walk records, participant records and atomic admission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalkRepository: Send + Sync {
    /// Insert a newly created walk.
    async fn insert_walk(&self, walk: &Walk) -> Result<(), WalkRepositoryError>;

    /// Find a walk by id.
    async fn find_walk(&self, walk_id: &WalkId) -> Result<Option<Walk>, WalkRepositoryError>;

    /// List every walk ordered by start time, ties broken by id.
    async fn list_walks(&self) -> Result<Vec<Walk>, WalkRepositoryError>;

    /// Number of participants recorded for a walk.
    async fn count_participants(&self, walk_id: &WalkId) -> Result<u32, WalkRepositoryError>;

    /// Find the participant record for `user_id` on `walk_id`.
    async fn find_participant(
        &self,
        walk_id: &WalkId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, WalkRepositoryError>;

    /// Participants of a walk in join order.
    async fn list_participants(
        &self,
        walk_id: &WalkId,
    ) -> Result<Vec<Participant>, WalkRepositoryError>;

    /// Insert a participant if absent and below capacity, applying the fill
    /// transition when the insert fills the walk.
    async fn admit_participant(
        &self,
        request: AdmissionRequest,
    ) -> Result<AdmissionOutcome, WalkRepositoryError>;

    /// Set the status to `new_status` only if it currently equals `expected`.
    async fn update_walk_status(
        &self,
        walk_id: &WalkId,
        new_status: WalkStatus,
        expected: WalkStatus,
    ) -> Result<StatusUpdate, WalkRepositoryError>;
}

/// Fixture implementation for tests that do not exercise walk persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWalkRepository;

#[async_trait]
impl WalkRepository for FixtureWalkRepository {
    async fn insert_walk(&self, _walk: &Walk) -> Result<(), WalkRepositoryError> {
        Ok(())
    }

    async fn find_walk(&self, _walk_id: &WalkId) -> Result<Option<Walk>, WalkRepositoryError> {
        Ok(None)
    }

    async fn list_walks(&self) -> Result<Vec<Walk>, WalkRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_participants(&self, _walk_id: &WalkId) -> Result<u32, WalkRepositoryError> {
        Ok(0)
    }

    async fn find_participant(
        &self,
        _walk_id: &WalkId,
        _user_id: &UserId,
    ) -> Result<Option<Participant>, WalkRepositoryError> {
        Ok(None)
    }

    async fn list_participants(
        &self,
        _walk_id: &WalkId,
    ) -> Result<Vec<Participant>, WalkRepositoryError> {
        Ok(Vec::new())
    }

    async fn admit_participant(
        &self,
        _request: AdmissionRequest,
    ) -> Result<AdmissionOutcome, WalkRepositoryError> {
        Ok(AdmissionOutcome::WalkMissing)
    }

    async fn update_walk_status(
        &self,
        _walk_id: &WalkId,
        _new_status: WalkStatus,
        _expected: WalkStatus,
    ) -> Result<StatusUpdate, WalkRepositoryError> {
        Ok(StatusUpdate::Missing)
    }
}
