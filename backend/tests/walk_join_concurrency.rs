//! Concurrency tests for walk admission.
//!
//! Joiners race on a multi-threaded runtime against one in-memory repository.
//! Whatever the interleaving, the seat count never exceeds capacity and the
//! walk is confirmed by exactly one admission.

use futures::future::join_all;
use rstest::rstest;

use walktalk::domain::WalkStatus;
use walktalk::domain::ports::{
    JoinError, JoinOutcome, JoinRequest, WalkCommand, WalkJoinCommand, WalkRepository,
};
use walktalk::domain::walks::WalkId;

mod support;

use support::{Engine, create_request, walker_named};

#[derive(Debug, Default)]
struct Tally {
    joined: usize,
    already_joined: usize,
    full: usize,
    confirmations: usize,
}

async fn publish(engine: &Engine) -> WalkId {
    engine
        .walks
        .create_walk(create_request(walker_named("Host"), engine.clock.utc()))
        .await
        .expect("walk published")
        .id
}

async fn race(engine: &Engine, walk_id: WalkId, requests: Vec<JoinRequest>) -> Tally {
    let handles = requests.into_iter().map(|request| {
        let joins = engine.joins.clone();
        assert_eq!(request.walk_id, walk_id);
        tokio::spawn(async move { joins.attempt_join(request).await })
    });

    let mut tally = Tally::default();
    for result in join_all(handles).await {
        match result.expect("join task") {
            Ok(JoinOutcome::Joined(receipt)) => {
                tally.joined += 1;
                if receipt.confirmed {
                    tally.confirmations += 1;
                }
            }
            Ok(JoinOutcome::AlreadyJoined { .. }) => tally.already_joined += 1,
            Err(JoinError::CapacityExceeded { counts, .. }) => {
                assert!(counts.is_full());
                tally.full += 1;
            }
            Err(other) => panic!("unexpected join failure: {other}"),
        }
    }
    tally
}

fn distinct_joiners(walk_id: WalkId, count: usize) -> Vec<JoinRequest> {
    (0..count)
        .map(|n| JoinRequest {
            walk_id,
            joiner: walker_named(&format!("Joiner{n}")),
        })
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_joiners_race_for_three_seats() {
    let engine = Engine::with_capacity(3);
    let walk_id = publish(&engine).await;

    let tally = race(&engine, walk_id, distinct_joiners(walk_id, 5)).await;

    assert_eq!(tally.joined, 3);
    assert_eq!(tally.full, 2);
    assert_eq!(tally.confirmations, 1);
    assert_eq!(engine.gateway.count("joined"), 3);
    assert_eq!(engine.gateway.count("capacity_reached"), 1);

    let stored = engine
        .repo
        .find_walk(&walk_id)
        .await
        .expect("find walk")
        .expect("walk exists");
    assert_eq!(stored.status(), WalkStatus::Confirmed);
    assert_eq!(
        engine.repo.count_participants(&walk_id).await.expect("count"),
        3
    );
}

#[rstest]
#[case::single_seat(1, 4)]
#[case::exact_fit(5, 5)]
#[case::heavy_oversubscription(4, 12)]
#[case::spare_seats(6, 3)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admissions_never_exceed_capacity(#[case] capacity: u32, #[case] joiners: usize) {
    let engine = Engine::with_capacity(capacity);
    let walk_id = publish(&engine).await;

    let tally = race(&engine, walk_id, distinct_joiners(walk_id, joiners)).await;

    let seats = usize::try_from(capacity).expect("capacity fits usize");
    let expected = seats.min(joiners);
    let filled = joiners >= seats;
    assert_eq!(tally.joined, expected);
    assert_eq!(tally.full, joiners - expected);
    assert_eq!(tally.confirmations, usize::from(filled));
    assert_eq!(engine.gateway.count("capacity_reached"), usize::from(filled));

    let stored = engine
        .repo
        .find_walk(&walk_id)
        .await
        .expect("find walk")
        .expect("walk exists");
    let expected_status = if filled {
        WalkStatus::Confirmed
    } else {
        WalkStatus::Scheduled
    };
    assert_eq!(stored.status(), expected_status);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_identity_is_admitted_once() {
    let engine = Engine::with_capacity(3);
    let walk_id = publish(&engine).await;
    let alice = walker_named("Alice");
    let requests = (0..4)
        .map(|_| JoinRequest {
            walk_id,
            joiner: alice.clone(),
        })
        .collect();

    let tally = race(&engine, walk_id, requests).await;

    assert_eq!(tally.joined, 1);
    assert_eq!(tally.already_joined, 3);
    assert_eq!(engine.gateway.count("joined"), 1);
    assert_eq!(
        engine.repo.count_participants(&walk_id).await.expect("count"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn walks_fill_independently() {
    let engine = Engine::with_capacity(2);
    let first = publish(&engine).await;
    let second = publish(&engine).await;

    let (a, b) = tokio::join!(
        race(&engine, first, distinct_joiners(first, 3)),
        race(&engine, second, distinct_joiners(second, 3)),
    );

    assert_eq!((a.joined, a.confirmations), (2, 1));
    assert_eq!((b.joined, b.confirmations), (2, 1));
    assert_eq!(engine.gateway.count("capacity_reached"), 2);
}
