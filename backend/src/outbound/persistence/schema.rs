//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when migrations change.

diesel::table! {
    /// Published walks.
    ///
    /// Enum-like columns (`pace`, `terrain`, `conversation_mode`,
    /// `dog_policy`, `status`) hold lowercase text constrained by `CHECK`s.
    walks (id) {
        id -> Uuid,
        title -> Text,
        host_user_id -> Uuid,
        host_name -> Text,
        host_email -> Text,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        pace -> Text,
        terrain -> Text,
        conversation_mode -> Text,
        dog_policy -> Text,
        non_smokers_only -> Bool,
        /// Joiner capacity; always positive.
        capacity -> Int4,
        area_label -> Text,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Participant records. The composite primary key enforces one record per
    /// walker per walk.
    walk_participants (walk_id, user_id) {
        walk_id -> Uuid,
        user_id -> Uuid,
        display_name -> Text,
        email -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::joinable!(walk_participants -> walks (walk_id));
diesel::allow_tables_to_appear_in_same_query!(walks, walk_participants);
