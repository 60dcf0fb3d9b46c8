//! PostgreSQL-backed `WalkRepository` implementation using Diesel ORM.
//!
//! Admission runs inside one transaction that first takes a row lock on the
//! walk (`SELECT ... FOR UPDATE`). Every concurrent admission for the same
//! walk queues on that lock, so the count, the insert and the fill transition
//! observe a single consistent state. Admissions for different walks never
//! block each other.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    AdmissionOutcome, AdmissionRequest, StatusUpdate, WalkRepository, WalkRepositoryError,
};
use crate::domain::walks::{Participant, ParticipantCounts, Walk, WalkDraft, WalkId, WalkStatus};
use crate::domain::{DisplayName, EmailAddress, UserId, Walker};

use super::diesel_walk_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewParticipantRow, NewWalkRow, ParticipantRow, WalkRow};
use super::pool::DbPool;
use super::schema::{walk_participants, walks};

/// Diesel-backed implementation of the `WalkRepository` port.
#[derive(Clone)]
pub struct DieselWalkRepository {
    pool: DbPool,
}

impl DieselWalkRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// What the admission transaction observed, before row conversion.
enum AdmissionRows {
    Inserted {
        count: u32,
        roster: Vec<ParticipantRow>,
        confirmed: bool,
    },
    AlreadyPresent {
        count: u32,
    },
    Full {
        count: u32,
    },
    NotJoinable {
        status: WalkStatus,
    },
    WalkMissing,
}

fn corrupt_row(kind: &str, id: Uuid, detail: impl std::fmt::Display) -> WalkRepositoryError {
    WalkRepositoryError::query(format!("stored {kind} {id} is invalid: {detail}"))
}

fn row_to_walker(
    user_id: Uuid,
    name: String,
    email: String,
) -> Result<Walker, crate::domain::UserValidationError> {
    Ok(Walker::new(
        UserId::from_uuid(user_id),
        DisplayName::new(name)?,
        EmailAddress::new(email)?,
    ))
}

fn row_to_walk(row: WalkRow) -> Result<Walk, WalkRepositoryError> {
    let id = row.id;
    let host = row_to_walker(row.host_user_id, row.host_name, row.host_email)
        .map_err(|err| corrupt_row("walk", id, err))?;
    let capacity = u32::try_from(row.capacity).map_err(|err| corrupt_row("walk", id, err))?;
    let status: WalkStatus = row
        .status
        .parse()
        .map_err(|err| corrupt_row("walk", id, err))?;
    let draft = WalkDraft {
        id: WalkId::from_uuid(id),
        title: row.title,
        host,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        pace: row.pace.parse().map_err(|err| corrupt_row("walk", id, err))?,
        terrain: row
            .terrain
            .parse()
            .map_err(|err| corrupt_row("walk", id, err))?,
        conversation_mode: row
            .conversation_mode
            .parse()
            .map_err(|err| corrupt_row("walk", id, err))?,
        dog_policy: row
            .dog_policy
            .parse()
            .map_err(|err| corrupt_row("walk", id, err))?,
        non_smokers_only: row.non_smokers_only,
        capacity,
        area_label: row.area_label,
        created_at: row.created_at,
    };
    Walk::restore(draft, status).map_err(|err| corrupt_row("walk", id, err))
}

fn row_to_participant(row: ParticipantRow) -> Result<Participant, WalkRepositoryError> {
    let walker = row_to_walker(row.user_id, row.display_name, row.email)
        .map_err(|err| corrupt_row("participant", row.walk_id, err))?;
    Ok(Participant::new(
        WalkId::from_uuid(row.walk_id),
        walker,
        row.joined_at,
    ))
}

fn walk_to_row(walk: &Walk) -> Result<NewWalkRow<'_>, WalkRepositoryError> {
    let capacity = i32::try_from(walk.capacity())
        .map_err(|err| corrupt_row("walk", *walk.id().as_uuid(), err))?;
    let host = walk.host();
    Ok(NewWalkRow {
        id: *walk.id().as_uuid(),
        title: walk.title(),
        host_user_id: *host.user_id().as_uuid(),
        host_name: host.name().as_ref(),
        host_email: host.email().as_ref(),
        starts_at: walk.starts_at(),
        ends_at: walk.ends_at(),
        pace: walk.pace().as_str(),
        terrain: walk.terrain().as_str(),
        conversation_mode: walk.conversation_mode().as_str(),
        dog_policy: walk.dog_policy().as_str(),
        non_smokers_only: walk.non_smokers_only(),
        capacity,
        area_label: walk.area_label(),
        status: walk.status().as_str(),
        created_at: walk.created_at(),
    })
}

fn clamp_count(count: i64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn decode_status(raw: &str) -> Result<WalkStatus, DieselError> {
    raw.parse()
        .map_err(|err| DieselError::DeserializationError(Box::new(err)))
}

async fn count_rows(conn: &mut AsyncPgConnection, walk_id: Uuid) -> Result<u32, DieselError> {
    let count: i64 = walk_participants::table
        .filter(walk_participants::walk_id.eq(walk_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(clamp_count(count))
}

async fn load_roster(
    conn: &mut AsyncPgConnection,
    walk_id: Uuid,
) -> Result<Vec<ParticipantRow>, DieselError> {
    walk_participants::table
        .filter(walk_participants::walk_id.eq(walk_id))
        .order((
            walk_participants::joined_at.asc(),
            walk_participants::user_id.asc(),
        ))
        .select(ParticipantRow::as_select())
        .load(conn)
        .await
}

/// Body of the admission transaction. The walk row lock is held until commit.
async fn admit_locked(
    conn: &mut AsyncPgConnection,
    request: &AdmissionRequest,
) -> Result<AdmissionRows, DieselError> {
    let walk_id = *request.walk_id().as_uuid();
    let locked_status: Option<String> = walks::table
        .find(walk_id)
        .select(walks::status)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(raw_status) = locked_status else {
        return Ok(AdmissionRows::WalkMissing);
    };
    let status = decode_status(&raw_status)?;
    if !request.admits(status) {
        return Ok(AdmissionRows::NotJoinable { status });
    }

    let walker = request.participant.walker();
    let user_id = *walker.user_id().as_uuid();
    let count = count_rows(conn, walk_id).await?;
    let existing: Option<Uuid> = walk_participants::table
        .find((walk_id, user_id))
        .select(walk_participants::user_id)
        .first(conn)
        .await
        .optional()?;
    if existing.is_some() {
        return Ok(AdmissionRows::AlreadyPresent { count });
    }
    if count >= request.capacity {
        return Ok(AdmissionRows::Full { count });
    }

    let inserted = diesel::insert_into(walk_participants::table)
        .values(NewParticipantRow {
            walk_id,
            user_id,
            display_name: walker.name().as_ref(),
            email: walker.email().as_ref(),
            joined_at: request.participant.joined_at(),
        })
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    if inserted == 0 {
        return Ok(AdmissionRows::AlreadyPresent { count });
    }

    let count = count.saturating_add(1);
    let confirmed = match request.status_after_insert(status, count) {
        Some(next) => {
            diesel::update(walks::table.find(walk_id))
                .set(walks::status.eq(next.as_str()))
                .execute(conn)
                .await?
                == 1
        }
        None => false,
    };
    let roster = load_roster(conn, walk_id).await?;
    Ok(AdmissionRows::Inserted {
        count,
        roster,
        confirmed,
    })
}

#[async_trait]
impl WalkRepository for DieselWalkRepository {
    async fn insert_walk(&self, walk: &Walk) -> Result<(), WalkRepositoryError> {
        let row = walk_to_row(walk)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(walks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(walk_id = %walk.id(), "walk inserted");
        Ok(())
    }

    async fn find_walk(&self, walk_id: &WalkId) -> Result<Option<Walk>, WalkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<WalkRow> = walks::table
            .find(*walk_id.as_uuid())
            .select(WalkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_walk).transpose()
    }

    async fn list_walks(&self) -> Result<Vec<Walk>, WalkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WalkRow> = walks::table
            .order((walks::starts_at.asc(), walks::id.asc()))
            .select(WalkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_walk).collect()
    }

    async fn count_participants(&self, walk_id: &WalkId) -> Result<u32, WalkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        count_rows(&mut conn, *walk_id.as_uuid())
            .await
            .map_err(map_diesel_error)
    }

    async fn find_participant(
        &self,
        walk_id: &WalkId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, WalkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ParticipantRow> = walk_participants::table
            .find((*walk_id.as_uuid(), *user_id.as_uuid()))
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_participant).transpose()
    }

    async fn list_participants(
        &self,
        walk_id: &WalkId,
    ) -> Result<Vec<Participant>, WalkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_roster(&mut conn, *walk_id.as_uuid())
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_participant)
            .collect()
    }

    async fn admit_participant(
        &self,
        request: AdmissionRequest,
    ) -> Result<AdmissionOutcome, WalkRepositoryError> {
        let capacity = request.capacity;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| async move { admit_locked(conn, &request).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)?;

        let outcome = match rows {
            AdmissionRows::Inserted {
                count,
                roster,
                confirmed,
            } => AdmissionOutcome::Inserted {
                counts: ParticipantCounts::new(count, capacity),
                roster: roster
                    .into_iter()
                    .map(row_to_participant)
                    .collect::<Result<_, _>>()?,
                confirmed,
            },
            AdmissionRows::AlreadyPresent { count } => AdmissionOutcome::AlreadyPresent {
                counts: ParticipantCounts::new(count, capacity),
            },
            AdmissionRows::Full { count } => AdmissionOutcome::Full {
                counts: ParticipantCounts::new(count, capacity),
            },
            AdmissionRows::NotJoinable { status } => AdmissionOutcome::NotJoinable { status },
            AdmissionRows::WalkMissing => AdmissionOutcome::WalkMissing,
        };
        Ok(outcome)
    }

    async fn update_walk_status(
        &self,
        walk_id: &WalkId,
        new_status: WalkStatus,
        expected: WalkStatus,
    ) -> Result<StatusUpdate, WalkRepositoryError> {
        let id = *walk_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            walks::table
                .filter(walks::id.eq(id))
                .filter(walks::status.eq(expected.as_str())),
        )
        .set(walks::status.eq(new_status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated == 1 {
            return Ok(StatusUpdate::Applied);
        }

        let actual: Option<String> = walks::table
            .find(id)
            .select(walks::status)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match actual {
            None => Ok(StatusUpdate::Missing),
            Some(raw) => {
                let actual = raw.parse().map_err(|err| corrupt_row("walk", id, err))?;
                Ok(StatusUpdate::Stale { actual })
            }
        }
    }
}
