//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{connection_requests, posts, users};

/// Row struct for reading identities without their credential hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub professional_type: Option<String>,
    pub phone: String,
    pub address: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: i32,
    pub qualification: String,
    pub expertise: String,
    pub hourly_rate: f64,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new identity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub professional_type: Option<&'a str>,
    pub phone: &'a str,
    pub address: &'a str,
    pub bio: &'a str,
    pub skills: &'a [String],
    pub experience: i32,
    pub qualification: &'a str,
    pub expertise: &'a str,
    pub hourly_rate: f64,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct rewriting the profile columns of an identity.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub phone: &'a str,
    pub address: &'a str,
    pub bio: &'a str,
    pub skills: &'a [String],
    pub experience: i32,
    pub qualification: &'a str,
    pub expertise: &'a str,
    pub hourly_rate: f64,
    pub rating: f64,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the connection_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = connection_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ConnectionRequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new connection request records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = connection_requests)]
pub(crate) struct NewConnectionRequestRow<'a> {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new post records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
