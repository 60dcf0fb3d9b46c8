//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{walk_participants, walks};

/// Row struct for reading from the walks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = walks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WalkRow {
    pub id: Uuid,
    pub title: String,
    pub host_user_id: Uuid,
    pub host_name: String,
    pub host_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub pace: String,
    pub terrain: String,
    pub conversation_mode: String,
    pub dog_policy: String,
    pub non_smokers_only: bool,
    pub capacity: i32,
    pub area_label: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating walk records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = walks)]
pub(crate) struct NewWalkRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub host_user_id: Uuid,
    pub host_name: &'a str,
    pub host_email: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub pace: &'a str,
    pub terrain: &'a str,
    pub conversation_mode: &'a str,
    pub dog_policy: &'a str,
    pub non_smokers_only: bool,
    pub capacity: i32,
    pub area_label: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the walk_participants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = walk_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub walk_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
}

/// Insertable struct for creating participant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = walk_participants)]
pub(crate) struct NewParticipantRow<'a> {
    pub walk_id: Uuid,
    pub user_id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub joined_at: DateTime<Utc>,
}
