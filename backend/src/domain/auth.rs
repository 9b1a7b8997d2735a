//! Authentication primitives: login credentials and password hashing.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords are held in zeroising buffers and only the Argon2id
//! hash produced by [`hash_password`] is ever stored.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use zeroize::Zeroizing;

use crate::domain::user::Email;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or failed the shape check.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` passed the shape check and is lowercased.
/// - `password` is non-empty but otherwise unconstrained; the signup policy
///   does not apply at login so older credentials keep working.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter42").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter42");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// # Errors
    /// Returns [`LoginValidationError`] when either part fails validation.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Minimum accepted password length at signup, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Errors raised while validating or hashing a new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The password was shorter than [`PASSWORD_MIN`].
    PasswordTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// The hashing backend rejected the input.
    Hashing(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::Hashing(detail) => write!(f, "password hashing failed: {detail}"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// A signup password that met the length policy.
///
/// The buffer is zeroised when the value is dropped.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`].
    ///
    /// # Errors
    /// Returns [`CredentialError::PasswordTooShort`] when the input has fewer
    /// than [`PASSWORD_MIN`] characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialError> {
        let raw = Zeroizing::new(raw.into());
        if raw.chars().count() < PASSWORD_MIN {
            return Err(CredentialError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(raw))
    }

    /// Borrow the plaintext for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
/// Returns [`CredentialError::Hashing`] when the backend fails; the detail is
/// loggable but is redacted before it reaches a client.
pub fn hash_password(password: &Password) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|error| CredentialError::Hashing(error.to_string()))?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC-format hash.
///
/// A malformed stored hash verifies as `false` so a corrupted row is
/// indistinguishable from a wrong password.
#[must_use]
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
