//! Diesel and pool error mapping for the walk repository.
//!
//! Serialization failures, deadlocks and lock timeouts are reported as
//! contention so the join engine can retry the admission. Every other
//! database failure is terminal for the request.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::WalkRepositoryError;

use super::pool::PoolError;

const LOCK_FAILURE_MARKERS: [&str; 3] = [
    "deadlock detected",
    "lock timeout",
    "could not obtain lock",
];

pub(super) fn map_pool_error(error: PoolError) -> WalkRepositoryError {
    WalkRepositoryError::connection(error.into_message())
}

pub(super) fn map_diesel_error(error: DieselError) -> WalkRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => WalkRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => WalkRepositoryError::query("database query error"),
        DieselError::DeserializationError(err) => {
            WalkRepositoryError::query(format!("stored value could not be decoded: {err}"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            WalkRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
            WalkRepositoryError::contention(info.message())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            WalkRepositoryError::conflict(info.message())
        }
        DieselError::DatabaseError(_, info) if is_lock_failure(info.message()) => {
            WalkRepositoryError::contention(info.message())
        }
        DieselError::DatabaseError(_, _) => WalkRepositoryError::query("database error"),
        _ => WalkRepositoryError::query("database error"),
    }
}

fn is_lock_failure(message: &str) -> bool {
    LOCK_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
