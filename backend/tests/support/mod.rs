//! Shared helper utilities for walk integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small builders and doubles live here instead of being copied per file.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use walktalk::domain::ports::{CreateWalkRequest, NotificationError, NotificationGateway};
use walktalk::domain::{
    ConversationMode, DogPolicy, NotificationEnvelope, Pace, Terrain, User, WalkCreationConfig,
    WalkJoinConfig, WalkJoinService, WalkService, Walker,
};
use walktalk::outbound::memory::InMemoryWalkRepository;

pub mod embedded_postgres;

/// Walker with a fresh identity and an email derived from `name`.
pub fn walker_named(name: &str) -> Walker {
    User::try_from_strings(
        Uuid::new_v4().to_string(),
        name,
        format!("{}@example.org", name.to_lowercase()),
    )
    .expect("valid walker")
    .walker()
}

/// Request for a 45 minute walk starting an hour after `now`.
pub fn create_request(host: Walker, now: DateTime<Utc>) -> CreateWalkRequest {
    let start_time = now + Duration::hours(1);
    CreateWalkRequest {
        title: "Riverside loop".to_owned(),
        host,
        start_time,
        end_time: start_time + Duration::minutes(45),
        pace: Pace::Medium,
        terrain: Terrain::Mixed,
        conversation_mode: ConversationMode::Light,
        dog_policy: DogPolicy::Indifferent,
        non_smokers_only: false,
        area_label: "Old bridge".to_owned(),
    }
}

/// Gateway that records every envelope it is asked to deliver.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<NotificationEnvelope>>,
}

impl RecordingGateway {
    /// Envelopes received so far, in delivery order.
    pub fn sent(&self) -> Vec<NotificationEnvelope> {
        self.sent.lock().expect("gateway lock").clone()
    }

    /// Number of envelopes named `event`.
    pub fn count(&self, event: &str) -> usize {
        self.sent
            .lock()
            .expect("gateway lock")
            .iter()
            .filter(|envelope| envelope.event == event)
            .count()
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        self.sent.lock().expect("gateway lock").push(envelope.clone());
        Ok(())
    }
}

/// Services sharing one in-memory repository and a recording gateway.
pub struct Engine {
    pub repo: Arc<InMemoryWalkRepository>,
    pub gateway: Arc<RecordingGateway>,
    pub walks: Arc<WalkService<InMemoryWalkRepository>>,
    pub joins: Arc<WalkJoinService<InMemoryWalkRepository>>,
    pub clock: Arc<dyn Clock>,
}

impl Engine {
    /// Wire services publishing walks of `capacity` seats.
    pub fn with_capacity(capacity: u32) -> Self {
        let repo = Arc::new(InMemoryWalkRepository::new());
        let gateway = Arc::new(RecordingGateway::default());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let walks = Arc::new(WalkService::new(
            repo.clone(),
            clock.clone(),
            WalkCreationConfig { capacity },
        ));
        let joins = Arc::new(WalkJoinService::new(
            repo.clone(),
            gateway.clone(),
            clock.clone(),
            WalkJoinConfig::default(),
        ));
        Self {
            repo,
            gateway,
            walks,
            joins,
            clock,
        }
    }
}
