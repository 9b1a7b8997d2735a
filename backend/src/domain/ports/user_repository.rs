//! Port abstraction for identity persistence adapters and their errors.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::{
    Email, ProfessionalType, ProfileChanges, Role, User, UserId, UserSummary,
};
use crate::domain::Error;

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Another account already holds this email.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserPersistenceError {
    /// Build a [`UserPersistenceError::Connection`] from any message type.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`UserPersistenceError::Query`] from any message type.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::DuplicateEmail => Error::conflict("User already exists"),
            UserPersistenceError::Connection { .. } => {
                Error::service_unavailable("service temporarily unavailable")
            }
            UserPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for identity storage, lookup, and search.
///
/// The password credential only crosses this boundary as an opaque hash:
/// inserted alongside a new identity and read back for login verification.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity with its password hash.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// already taken, comparing case-insensitively.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Fetch an identity by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an identity and its password hash by email, for login.
    async fn find_for_login(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, UserPersistenceError>;

    /// Apply a partial profile update, returning the refreshed identity.
    ///
    /// Returns `Ok(None)` when no identity has the given id.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Case-insensitive substring search over name, role, and profession,
    /// excluding the given identity.
    async fn search(
        &self,
        keyword: &str,
        exclude: &UserId,
    ) -> Result<Vec<UserSummary>, UserPersistenceError>;

    /// List professional identities with the given profession.
    async fn list_professionals(
        &self,
        profession: ProfessionalType,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Resolve public summaries for a set of identity ids.
    ///
    /// Unknown ids are skipped rather than erroring.
    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError>;
}

/// In-memory implementation backing tests and the no-database server mode.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    store: Mutex<HashMap<UserId, (User, String)>>,
}

impl FixtureUserRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, (User, String)>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_keyword(user: &User, needle: &str) -> bool {
    let name = user.name().as_ref().to_lowercase();
    let role = user.role().as_str();
    let profession = user
        .professional_type()
        .map(|profession| profession.as_str().to_lowercase());
    name.contains(needle)
        || role.contains(needle)
        || profession.is_some_and(|profession| profession.contains(needle))
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut guard = self.lock();
        if guard
            .values()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        guard.insert(user.id().clone(), (user.clone(), password_hash.to_owned()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().get(id).map(|(user, _)| user.clone()))
    }

    async fn find_for_login(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        Ok(self
            .lock()
            .values()
            .find(|(user, _)| user.email() == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut guard = self.lock();
        let Some((user, _)) = guard.get_mut(id) else {
            return Ok(None);
        };

        let mut profile = user.profile().clone();
        changes.apply_to(&mut profile);
        *user = user.clone().with_profile(profile, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn search(
        &self,
        keyword: &str,
        exclude: &UserId,
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .lock()
            .values()
            .filter(|(user, _)| user.id() != exclude && matches_keyword(user, &needle))
            .map(|(user, _)| user.summary())
            .collect())
    }

    async fn list_professionals(
        &self,
        profession: ProfessionalType,
    ) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .values()
            .filter(|(user, _)| {
                user.role() == Role::Professional
                    && user.professional_type() == Some(profession)
            })
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let guard = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| guard.get(id).map(|(user, _)| user.summary()))
            .collect())
    }
}
