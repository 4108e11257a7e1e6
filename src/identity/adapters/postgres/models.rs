//! Diesel row models for identity persistence.

use super::schema::{user_profiles, users};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Unique login handle.
    pub handle: String,
    /// Optional password hash.
    pub password_hash: Option<String>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Unique login handle.
    pub handle: String,
    /// Optional password hash.
    pub password_hash: Option<String>,
}

/// Query result row for profile records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Chat-platform participant id.
    pub external_chat_id: Option<i64>,
    /// Conversation handle.
    pub conversation_handle: Option<String>,
}

/// Insert model for profile records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub struct NewProfileRow {
    /// Owning user.
    pub user_id: i64,
    /// Chat-platform participant id.
    pub external_chat_id: Option<i64>,
    /// Conversation handle.
    pub conversation_handle: Option<String>,
}
