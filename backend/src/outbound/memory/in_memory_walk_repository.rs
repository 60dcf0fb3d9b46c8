//! Process-local `WalkRepository` used when no database is configured.
//!
//! All state sits behind one async mutex. Admission holds the lock across its
//! whole check-and-insert, which serializes admissions exactly like the row
//! lock taken by the PostgreSQL adapter. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::UserId;
use crate::domain::ports::{
    AdmissionOutcome, AdmissionRequest, StatusUpdate, WalkRepository, WalkRepositoryError,
};
use crate::domain::walks::{Participant, ParticipantCounts, Walk, WalkId, WalkStatus};

#[derive(Default)]
struct Store {
    walks: HashMap<WalkId, Walk>,
    participants: HashMap<WalkId, Vec<Participant>>,
}

impl Store {
    fn roster(&self, walk_id: &WalkId) -> &[Participant] {
        self.participants
            .get(walk_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn count(&self, walk_id: &WalkId) -> u32 {
        u32::try_from(self.roster(walk_id).len()).unwrap_or(u32::MAX)
    }
}

/// In-memory implementation of the `WalkRepository` port.
#[derive(Default)]
pub struct InMemoryWalkRepository {
    store: Mutex<Store>,
}

impl InMemoryWalkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalkRepository for InMemoryWalkRepository {
    async fn insert_walk(&self, walk: &Walk) -> Result<(), WalkRepositoryError> {
        let mut store = self.store.lock().await;
        if store.walks.contains_key(&walk.id()) {
            return Err(WalkRepositoryError::conflict(format!(
                "walk {} already exists",
                walk.id()
            )));
        }
        store.walks.insert(walk.id(), walk.clone());
        Ok(())
    }

    async fn find_walk(&self, walk_id: &WalkId) -> Result<Option<Walk>, WalkRepositoryError> {
        Ok(self.store.lock().await.walks.get(walk_id).cloned())
    }

    async fn list_walks(&self) -> Result<Vec<Walk>, WalkRepositoryError> {
        let store = self.store.lock().await;
        let mut walks: Vec<Walk> = store.walks.values().cloned().collect();
        walks.sort_by_key(|walk| (walk.starts_at(), walk.id()));
        Ok(walks)
    }

    async fn count_participants(&self, walk_id: &WalkId) -> Result<u32, WalkRepositoryError> {
        Ok(self.store.lock().await.count(walk_id))
    }

    async fn find_participant(
        &self,
        walk_id: &WalkId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, WalkRepositoryError> {
        let store = self.store.lock().await;
        Ok(store
            .roster(walk_id)
            .iter()
            .find(|participant| participant.walker().user_id() == user_id)
            .cloned())
    }

    async fn list_participants(
        &self,
        walk_id: &WalkId,
    ) -> Result<Vec<Participant>, WalkRepositoryError> {
        Ok(self.store.lock().await.roster(walk_id).to_vec())
    }

    async fn admit_participant(
        &self,
        request: AdmissionRequest,
    ) -> Result<AdmissionOutcome, WalkRepositoryError> {
        let walk_id = request.walk_id();
        let mut store = self.store.lock().await;
        let Some(status) = store.walks.get(&walk_id).map(Walk::status) else {
            return Ok(AdmissionOutcome::WalkMissing);
        };
        if !request.admits(status) {
            return Ok(AdmissionOutcome::NotJoinable { status });
        }

        let count = store.count(&walk_id);
        let joiner = request.participant.walker().user_id();
        if store
            .roster(&walk_id)
            .iter()
            .any(|participant| participant.walker().user_id() == joiner)
        {
            return Ok(AdmissionOutcome::AlreadyPresent {
                counts: ParticipantCounts::new(count, request.capacity),
            });
        }
        if count >= request.capacity {
            return Ok(AdmissionOutcome::Full {
                counts: ParticipantCounts::new(count, request.capacity),
            });
        }

        let count = count.saturating_add(1);
        let next = request.status_after_insert(status, count);
        let roster = store.participants.entry(walk_id).or_default();
        roster.push(request.participant);
        let roster = roster.clone();
        if let Some(next) = next {
            if let Some(walk) = store.walks.get_mut(&walk_id) {
                walk.set_status(next);
            }
        }

        Ok(AdmissionOutcome::Inserted {
            counts: ParticipantCounts::new(count, request.capacity),
            roster,
            confirmed: next.is_some(),
        })
    }

    async fn update_walk_status(
        &self,
        walk_id: &WalkId,
        new_status: WalkStatus,
        expected: WalkStatus,
    ) -> Result<StatusUpdate, WalkRepositoryError> {
        let mut store = self.store.lock().await;
        let Some(walk) = store.walks.get_mut(walk_id) else {
            return Ok(StatusUpdate::Missing);
        };
        let actual = walk.status();
        if actual != expected {
            return Ok(StatusUpdate::Stale { actual });
        }
        walk.set_status(new_status);
        Ok(StatusUpdate::Applied)
    }
}
