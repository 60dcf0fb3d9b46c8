//! Test utilities for the backend crate.
//!
//! Shared fixtures for unit tests in `src/`. Only compiled under `cfg(test)`.

pub mod clock {
    //! Deterministic clocks.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Fixed reference instant used across domain tests.
    pub fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    /// Clock that reports a settable instant.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance(&self, delta: TimeDelta) {
            *self.lock_clock() += delta;
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Default for MutableClock {
        fn default() -> Self {
            Self::new(fixture_now())
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod walks {
    //! Builders for walkers and walks.

    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use crate::domain::walks::{
        ConversationMode, DogPolicy, Pace, Participant, Terrain, Walk, WalkDraft, WalkId,
        WalkStatus,
    };
    use crate::domain::{User, Walker};

    /// Walker with a deterministic id derived from `n`.
    pub fn walker(n: u128) -> Walker {
        User::try_from_strings(
            Uuid::from_u128(n).to_string(),
            format!("Walker {n}"),
            format!("walker{n}@example.org"),
        )
        .expect("valid walker")
        .walker()
    }

    /// Draft for a 45 minute walk starting an hour after `now`.
    pub fn walk_draft(host: Walker, capacity: u32, now: DateTime<Utc>) -> WalkDraft {
        let starts_at = now + Duration::hours(1);
        WalkDraft {
            id: WalkId::random(),
            title: "Riverside loop".to_owned(),
            host,
            starts_at,
            ends_at: starts_at + Duration::minutes(45),
            pace: Pace::Medium,
            terrain: Terrain::Mixed,
            conversation_mode: ConversationMode::Light,
            dog_policy: DogPolicy::Indifferent,
            non_smokers_only: false,
            capacity,
            area_label: "Old bridge".to_owned(),
            created_at: now,
        }
    }

    /// Stored walk with the given capacity and status.
    pub fn walk(capacity: u32, status: WalkStatus, now: DateTime<Utc>) -> Walk {
        Walk::restore(walk_draft(walker(0), capacity, now), status).expect("valid walk")
    }

    /// Participant record for walker `n` on `walk_id`.
    pub fn participant(walk_id: WalkId, n: u128, joined_at: DateTime<Utc>) -> Participant {
        Participant::new(walk_id, walker(n), joined_at)
    }
}
