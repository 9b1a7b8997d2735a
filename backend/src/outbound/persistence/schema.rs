//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation. When
//! a migration changes the schema, update this file to match (or regenerate
//! it with `diesel print-schema` against a migrated database).

diesel::table! {
    /// Registered identities with their credential hash and profile.
    ///
    /// `email` carries a unique index, compared in lowercase. The
    /// `professional_type` column is null exactly when `role` is `user`.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Login email, stored lowercased.
        email -> Varchar,
        /// Argon2id password hash; never leaves the persistence layer.
        password_hash -> Text,
        /// Account role: `user` or `professional`.
        role -> Varchar,
        /// Professional trade; null for plain users.
        professional_type -> Nullable<Varchar>,
        /// Contact phone number, free form.
        phone -> Text,
        /// Postal address, free form.
        address -> Text,
        /// Short biography.
        bio -> Text,
        /// Ordered skill labels.
        skills -> Array<Text>,
        /// Years of experience; checked non-negative.
        experience -> Int4,
        /// Qualification text.
        qualification -> Text,
        /// Expertise level text.
        expertise -> Text,
        /// Hourly rate; checked non-negative.
        hourly_rate -> Float8,
        /// Aggregate rating; checked non-negative.
        rating -> Float8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Connection requests between identity pairs.
    ///
    /// A unique index over the unordered pair (least, greatest of sender and
    /// receiver) enforces at most one request per pair in either direction.
    connection_requests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Identity that sent the request.
        sender_id -> Uuid,
        /// Identity the request is addressed to.
        receiver_id -> Uuid,
        /// Lifecycle status: `pending`, `accepted`, or `rejected`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable posts with an optional stored-image reference.
    posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Authoring identity.
        author_id -> Uuid,
        /// Trimmed post text.
        content -> Text,
        /// Content-addressed image file name; null when no image attached.
        image -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
