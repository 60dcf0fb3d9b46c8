//! Integration tests for `DieselWalkRepository`.
//!
//! Admission runs against embedded PostgreSQL so the row lock, the
//! `ON CONFLICT` insert and the conditional status writes are exercised for
//! real. Set `SKIP_TEST_CLUSTER=1` where no cluster can start.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use mockable::{Clock, DefaultClock};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use walktalk::domain::ports::{
    AdmissionOutcome, AdmissionRequest, StatusUpdate, WalkCommand, WalkRepository,
};
use walktalk::domain::walks::WalkId;
use walktalk::domain::{
    Participant, ParticipantCounts, WalkCreationConfig, WalkService, WalkStatus,
};
use walktalk::outbound::persistence::{DbPool, DieselWalkRepository, PoolConfig};

mod support;

use support::embedded_postgres::{handle_cluster_setup_failure, migrated_database};
use support::{create_request, walker_named};

struct TestContext {
    runtime: Runtime,
    repository: Arc<DieselWalkRepository>,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn publish(&self, capacity: u32) -> WalkId {
        let walks = WalkService::new(
            self.repository.clone(),
            Arc::new(DefaultClock) as Arc<dyn Clock>,
            WalkCreationConfig { capacity },
        );
        self.runtime
            .block_on(walks.create_walk(create_request(walker_named("Host"), Utc::now())))
            .expect("walk published")
            .id
    }

    fn admit(&self, walk_id: WalkId, name: &str, capacity: u32) -> AdmissionOutcome {
        let participant = Participant::new(walk_id, walker_named(name), Utc::now());
        self.runtime
            .block_on(
                self.repository
                    .admit_participant(AdmissionRequest::new(participant, capacity)),
            )
            .expect("admission")
    }

    fn status(&self, walk_id: WalkId) -> WalkStatus {
        self.runtime
            .block_on(self.repository.find_walk(&walk_id))
            .expect("find walk")
            .expect("walk exists")
            .status()
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = migrated_database()?;
    let config = PoolConfig::new(database.url().to_string())
        .with_max_size(5)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: Arc::new(DieselWalkRepository::new(pool)),
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn racing_joiners_fill_three_seats_once(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: racing_joiners_fill_three_seats_once skipped");
        return;
    };
    let walk_id = context.publish(3);

    let outcomes = context.runtime.block_on(async {
        let tasks = (0..5).map(|n| {
            let repository = context.repository.clone();
            let participant =
                Participant::new(walk_id, walker_named(&format!("Racer{n}")), Utc::now());
            tokio::spawn(async move {
                repository
                    .admit_participant(AdmissionRequest::new(participant, 3))
                    .await
            })
        });
        join_all(tasks).await
    });

    let mut inserted = 0;
    let mut confirmations = 0;
    let mut full = 0;
    for outcome in outcomes {
        match outcome.expect("admission task").expect("admission") {
            AdmissionOutcome::Inserted { confirmed, .. } => {
                inserted += 1;
                if confirmed {
                    confirmations += 1;
                }
            }
            AdmissionOutcome::Full { counts } => {
                assert_eq!(counts, ParticipantCounts::new(3, 3));
                full += 1;
            }
            other => panic!("unexpected admission outcome: {other:?}"),
        }
    }

    assert_eq!((inserted, confirmations, full), (3, 1, 2));
    let count = context
        .runtime
        .block_on(context.repository.count_participants(&walk_id))
        .expect("count");
    assert_eq!(count, 3);
    assert_eq!(context.status(walk_id), WalkStatus::Confirmed);
}

#[rstest]
fn repeated_identity_is_stored_once(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: repeated_identity_is_stored_once skipped");
        return;
    };
    let walk_id = context.publish(3);
    let walker = walker_named("Alice");
    let admit_alice = || {
        let participant = Participant::new(walk_id, walker.clone(), Utc::now());
        context
            .runtime
            .block_on(
                context
                    .repository
                    .admit_participant(AdmissionRequest::new(participant, 3)),
            )
            .expect("admission")
    };

    let first = admit_alice();
    let repeat = admit_alice();

    assert!(matches!(first, AdmissionOutcome::Inserted { confirmed: false, .. }));
    assert_eq!(repeat, AdmissionOutcome::AlreadyPresent {
        counts: ParticipantCounts::new(1, 3)
    });
    let roster = context
        .runtime
        .block_on(context.repository.list_participants(&walk_id))
        .expect("roster");
    assert_eq!(roster.len(), 1);
    assert_eq!(context.status(walk_id), WalkStatus::Scheduled);
}

#[rstest]
fn canceled_walk_refuses_admission(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: canceled_walk_refuses_admission skipped");
        return;
    };
    let walk_id = context.publish(3);
    context
        .runtime
        .block_on(context.repository.update_walk_status(
            &walk_id,
            WalkStatus::Canceled,
            WalkStatus::Scheduled,
        ))
        .expect("cancel");

    let outcome = context.admit(walk_id, "Bob", 3);

    assert_eq!(outcome, AdmissionOutcome::NotJoinable {
        status: WalkStatus::Canceled
    });
}

#[rstest]
fn status_update_only_applies_from_expected_status(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: status_update_only_applies_from_expected_status skipped");
        return;
    };
    let walk_id = context.publish(2);
    let update = |next, expected| {
        context
            .runtime
            .block_on(context.repository.update_walk_status(&walk_id, next, expected))
            .expect("status update")
    };

    let stale = update(WalkStatus::Started, WalkStatus::Confirmed);
    let applied = update(WalkStatus::Canceled, WalkStatus::Scheduled);
    let missing = context
        .runtime
        .block_on(context.repository.update_walk_status(
            &WalkId::random(),
            WalkStatus::Canceled,
            WalkStatus::Scheduled,
        ))
        .expect("status update");

    assert_eq!(stale, StatusUpdate::Stale {
        actual: WalkStatus::Scheduled
    });
    assert_eq!(applied, StatusUpdate::Applied);
    assert_eq!(missing, StatusUpdate::Missing);
    assert_eq!(context.status(walk_id), WalkStatus::Canceled);
}
