//! Account lifecycle service.
//!
//! Owns the identity flows that sit behind the authentication and profile
//! endpoints: registering an account, checking credentials at login, reading a
//! profile, applying partial profile edits, and listing professionals by
//! trade. Handlers validate raw payloads into domain types before calling in,
//! so every method here works with already-trusted values and focuses on
//! policy: who may do what, and which repository failure maps to which
//! [`Error`].

use std::sync::Arc;

use chrono::Utc;

use crate::domain::auth::{
    CredentialError, LoginCredentials, Password, hash_password, verify_password,
};
use crate::domain::error::Error;
use crate::domain::ports::UserRepository;
use crate::domain::user::{
    Email, PersonName, ProfessionalType, ProfileChanges, Role, User, UserDraft, UserId,
    UserProfile,
};

/// Validated signup payload.
///
/// Built by the HTTP layer from the raw request body; every field has already
/// passed its newtype validation by the time the form reaches
/// [`AccountService::signup`].
#[derive(Debug)]
pub struct SignupForm {
    pub name: PersonName,
    pub email: Email,
    pub password: Password,
    pub role: Role,
    pub professional_type: Option<ProfessionalType>,
}

/// Application service for account registration, login and profiles.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Creates a service backed by the given user repository.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a new account and returns the stored user.
    ///
    /// A professional signup must name its trade; a plain user signup ignores
    /// any trade sent along. The password is hashed before it reaches the
    /// repository, so plaintext never crosses the port.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when a professional signup omits the trade.
    /// - `conflict` when the email is already registered.
    /// - `service_unavailable` or `internal` when persistence fails.
    pub async fn signup(&self, form: SignupForm) -> Result<User, Error> {
        let professional_type = match form.role {
            Role::Professional => Some(
                form.professional_type
                    .ok_or_else(|| Error::invalid_request("Professional type is required"))?,
            ),
            Role::User => None,
        };
        let password_hash = hash_password(&form.password).map_err(credential_error)?;
        let now = Utc::now();
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: form.name,
            email: form.email,
            role: form.role,
            professional_type,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.users.insert(&user, &password_hash).await?;
        Ok(user)
    }

    /// Checks credentials and returns the matching user.
    ///
    /// Lookup and password failures collapse into the same `unauthorized`
    /// response so a caller cannot probe which emails exist. A correct
    /// password presented against the wrong role is rejected with `forbidden`
    /// naming the role the account actually holds.
    ///
    /// # Errors
    ///
    /// - `unauthorized` when the email is unknown or the password is wrong.
    /// - `forbidden` when the account exists under a different role.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        requested_role: Role,
    ) -> Result<User, Error> {
        let Some((user, stored_hash)) = self.users.find_for_login(credentials.email()).await?
        else {
            return Err(Error::unauthorized("Invalid credentials"));
        };
        if user.role() != requested_role {
            return Err(Error::forbidden(format!(
                "You are registered as {}",
                user.role()
            )));
        }
        if !verify_password(&stored_hash, credentials.password()) {
            return Err(Error::unauthorized("Invalid credentials"));
        }
        Ok(user)
    }

    /// Fetches a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no account matches.
    pub async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Applies a partial profile edit on behalf of `actor`.
    ///
    /// Only the owner may edit a profile. Fields absent from `changes` keep
    /// their stored values.
    ///
    /// # Errors
    ///
    /// - `forbidden` when `actor` is not the profile owner.
    /// - `invalid_request` when a supplied field fails validation.
    /// - `not_found` when the target account does not exist.
    pub async fn update_profile(
        &self,
        actor: &UserId,
        target: &UserId,
        changes: &ProfileChanges,
    ) -> Result<User, Error> {
        if actor != target {
            return Err(Error::forbidden("You can only update your own profile"));
        }
        changes
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.users
            .update_profile(target, changes)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Lists professionals whose trade matches `raw_type`, ignoring case.
    ///
    /// A string that names no known trade yields an empty list rather than an
    /// error, so the directory endpoint degrades quietly on typos.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn professionals(&self, raw_type: &str) -> Result<Vec<User>, Error> {
        let Some(professional_type) = ProfessionalType::parse_ci(raw_type) else {
            return Ok(Vec::new());
        };
        Ok(self.users.list_professionals(professional_type).await?)
    }
}

fn credential_error(error: CredentialError) -> Error {
    match error {
        CredentialError::PasswordTooShort { .. } => Error::invalid_request(error.to_string()),
        CredentialError::Hashing(_) => Error::internal(error.to_string()),
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
