//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Stores identities with their credential hash and profile columns. The
//! hash is selected only by the login lookup; every other read uses a row
//! struct that omits it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, PersonName, ProfessionalType, ProfileChanges, Role, User, UserDraft, UserId,
    UserProfile, UserSummary,
};

use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Insert failures additionally watch for the unique email index.
fn map_insert_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserPersistenceError::DuplicateEmail;
    }
    map_diesel_error(error)
}

fn invalid_row(detail: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("stored identity failed validation: {detail}"))
}

/// Convert a database row back into a domain identity.
///
/// Stored data has passed domain validation on the way in, so a failure here
/// means the row was edited outside the application.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let role = row.role.parse::<Role>().map_err(invalid_row)?;
    let professional_type = row
        .professional_type
        .as_deref()
        .map(|raw| {
            ProfessionalType::parse_ci(raw)
                .ok_or_else(|| invalid_row(format!("unknown professional type {raw:?}")))
        })
        .transpose()?;
    let profile = UserProfile {
        phone: row.phone,
        address: row.address,
        bio: row.bio,
        skills: row.skills,
        experience: row.experience,
        qualification: row.qualification,
        expertise: row.expertise,
        hourly_rate: row.hourly_rate,
        rating: row.rating,
    };

    User::new(UserDraft {
        id: UserId::from_uuid(row.id),
        name: PersonName::new(&row.name).map_err(invalid_row)?,
        email: Email::new(&row.email).map_err(invalid_row)?,
        role,
        professional_type,
        profile,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(invalid_row)
}

fn new_user_row<'a>(user: &'a User, password_hash: &'a str) -> NewUserRow<'a> {
    let profile = user.profile();
    NewUserRow {
        id: *user.id().as_uuid(),
        name: user.name().as_ref(),
        email: user.email().as_ref(),
        password_hash,
        role: user.role().as_str(),
        professional_type: user.professional_type().map(|p| p.as_str()),
        phone: &profile.phone,
        address: &profile.address,
        bio: &profile.bio,
        skills: &profile.skills,
        experience: profile.experience,
        qualification: &profile.qualification,
        expertise: &profile.expertise,
        hourly_rate: profile.hourly_rate,
        rating: profile.rating,
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

/// Build a `LIKE` pattern matching the keyword anywhere, with wildcard
/// characters in the input escaped.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = new_user_row(user, password_hash);
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_for_login(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result: Option<(UserRow, String)> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select((UserRow::as_select(), users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match result {
            Some((row, hash)) => Ok(Some((row_to_user(row)?, hash))),
            None => Ok(None),
        }
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let existing: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = existing else {
            return Ok(None);
        };
        let user = row_to_user(row)?;

        let mut profile = user.profile().clone();
        changes.apply_to(&mut profile);
        let updated_at = chrono::Utc::now();

        let update = UserProfileUpdate {
            phone: &profile.phone,
            address: &profile.address,
            bio: &profile.bio,
            skills: &profile.skills,
            experience: profile.experience,
            qualification: &profile.qualification,
            expertise: &profile.expertise,
            hourly_rate: profile.hourly_rate,
            rating: profile.rating,
            updated_at,
        };
        diesel::update(users::table.find(id.as_uuid()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(user.with_profile(profile, updated_at)))
    }

    async fn search(
        &self,
        keyword: &str,
        exclude: &UserId,
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let pattern = like_pattern(keyword);
        let rows: Vec<UserRow> = users::table
            .filter(users::id.ne(exclude.as_uuid()))
            .filter(
                users::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(users::role.ilike(pattern.clone()).nullable())
                    .or(users::professional_type.ilike(pattern)),
            )
            .order(users::name.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row_to_user(row).map(|user| user.summary()))
            .collect()
    }

    async fn list_professionals(
        &self,
        profession: ProfessionalType,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::role.eq(Role::Professional.as_str()))
            .filter(users::professional_type.eq(profession.as_str()))
            .order(users::name.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row_to_user(row).map(|user| user.summary()))
            .collect()
    }
}
