//! User identity data model.
//!
//! Purpose: strongly typed identity attributes shared by the API and
//! persistence layers. Constructors validate their input; serde passes
//! through DTOs so deserialised values satisfy the same invariants.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum UserValidationError {
    /// The supplied id was empty.
    EmptyId,
    /// The supplied id was not a canonical UUID.
    InvalidId,
    /// The name was shorter than the minimum length.
    NameTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// The name exceeded the maximum length.
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The name contained characters outside the accepted set.
    NameInvalidCharacters,
    /// The email failed the shape check.
    InvalidEmail,
    /// The role string matched no known role.
    UnknownRole,
    /// The professional type string matched no known profession.
    UnknownProfessionalType,
    /// A professional account was created without a professional type.
    MissingProfessionalType,
    /// A plain user account carried a professional type.
    UnexpectedProfessionalType,
    /// Years of experience below zero.
    NegativeExperience,
    /// Hourly rate below zero.
    NegativeHourlyRate,
    /// Rating below zero.
    NegativeRating,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::NameTooShort { min } => {
                write!(f, "name must be at least {min} characters")
            }
            Self::NameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
            Self::NameInvalidCharacters => write!(
                f,
                "name may only contain letters, numbers, spaces, dots, apostrophes, or hyphens",
            ),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::UnknownRole => write!(f, "role must be 'user' or 'professional'"),
            Self::UnknownProfessionalType => write!(f, "professional type is not recognised"),
            Self::MissingProfessionalType => {
                write!(f, "professional accounts require a professional type")
            }
            Self::UnexpectedProfessionalType => {
                write!(f, "plain user accounts must not carry a professional type")
            }
            Self::NegativeExperience => write!(f, "experience must be zero or more years"),
            Self::NegativeHourlyRate => write!(f, "hourly rate must be zero or more"),
            Self::NegativeRating => write!(f, "rating must be zero or more"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

// The `ToSchema` derive cannot apply `value_type`/`format` overrides to a
// multi-field tuple struct, so the declared schema (a UUID-formatted string)
// is implemented by hand.
impl utoipa::PartialSchema for UserId {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .format(Some(utoipa::openapi::SchemaFormat::KnownFormat(
                utoipa::openapi::KnownFormat::Uuid,
            )))
            .description(Some("Stable user identifier stored as a UUID."))
            .into()
    }
}

impl ToSchema for UserId {}

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the input is empty or not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Construct a [`UserId`] from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

/// Minimum allowed length for a person name.
pub const NAME_MIN: usize = 2;
/// Maximum allowed length for a person name.
pub const NAME_MAX: usize = 80;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z][A-Za-z0-9 .'-]*$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

/// Validated person name, trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Ada Lovelace")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the trimmed input violates the
    /// length or character rules.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        let length = trimmed.chars().count();
        if length < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        if length > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        if !name_regex().is_match(trimmed) {
            return Err(UserValidationError::NameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address, lowercased on construction.
///
/// Uniqueness is case-insensitive; storing the lowercase form keeps equality
/// checks and the database index in agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.com")]
pub struct Email(String);

impl Email {
    /// Validate, lowercase, and construct an [`Email`].
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidEmail`] when the trimmed input
    /// fails the shape check or exceeds the length cap.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.chars().count() > EMAIL_MAX || !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Account role distinguishing plain users from professionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A plain account with no profession attached.
    User,
    /// A professional account; carries a [`ProfessionalType`].
    Professional,
}

impl Role {
    /// Stable lowercase form used in storage and token claims.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "professional" => Ok(Self::Professional),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Profession attached to professional accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProfessionalType {
    /// Teaching professionals.
    Teacher,
    /// Software developers.
    Developer,
    /// Carpenters.
    Carpenter,
    /// Plumbers.
    Plumber,
    /// Electricians.
    Electrician,
    /// Designers.
    Designer,
}

impl ProfessionalType {
    /// All known professions in display order.
    pub const ALL: [Self; 6] = [
        Self::Teacher,
        Self::Developer,
        Self::Carpenter,
        Self::Plumber,
        Self::Electrician,
        Self::Designer,
    ];

    /// Stable display form used in storage and responses.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::Developer => "Developer",
            Self::Carpenter => "Carpenter",
            Self::Plumber => "Plumber",
            Self::Electrician => "Electrician",
            Self::Designer => "Designer",
        }
    }

    /// Case-insensitive lookup used when matching path segments.
    #[must_use]
    pub fn parse_ci(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for ProfessionalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfessionalType {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_ci(s).ok_or(UserValidationError::UnknownProfessionalType)
    }
}

/// Free-form profile metadata carried by every identity.
///
/// All fields default to empty or zero at signup and are edited later through
/// [`ProfileChanges`]. Numeric fields are validated by [`User::new`] and
/// [`ProfileChanges::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Contact phone number, free form.
    #[serde(default)]
    pub phone: String,
    /// Postal address, free form.
    #[serde(default)]
    pub address: String,
    /// Short biography.
    #[serde(default)]
    pub bio: String,
    /// Ordered list of skill labels.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Years of experience; never negative.
    #[serde(default)]
    pub experience: i32,
    /// Qualification text.
    #[serde(default)]
    pub qualification: String,
    /// Expertise level text.
    #[serde(default)]
    pub expertise: String,
    /// Hourly rate; never negative.
    #[serde(default)]
    pub hourly_rate: f64,
    /// Aggregate rating; never negative.
    #[serde(default)]
    pub rating: f64,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileChanges {
    /// Replacement phone number.
    pub phone: Option<String>,
    /// Replacement address.
    pub address: Option<String>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement skill list.
    pub skills: Option<Vec<String>>,
    /// Replacement years of experience.
    pub experience: Option<i32>,
    /// Replacement qualification text.
    pub qualification: Option<String>,
    /// Replacement expertise text.
    pub expertise: Option<String>,
    /// Replacement hourly rate.
    pub hourly_rate: Option<f64>,
}

impl ProfileChanges {
    /// Check the numeric bounds shared with [`UserProfile`].
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when experience or hourly rate is
    /// negative.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.experience.is_some_and(|years| years < 0) {
            return Err(UserValidationError::NegativeExperience);
        }
        if self.hourly_rate.is_some_and(|rate| rate < 0.0) {
            return Err(UserValidationError::NegativeHourlyRate);
        }
        Ok(())
    }

    /// Apply the changes to a profile, leaving `None` fields untouched.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(phone) = &self.phone {
            profile.phone.clone_from(phone);
        }
        if let Some(address) = &self.address {
            profile.address.clone_from(address);
        }
        if let Some(bio) = &self.bio {
            profile.bio.clone_from(bio);
        }
        if let Some(skills) = &self.skills {
            profile.skills.clone_from(skills);
        }
        if let Some(experience) = self.experience {
            profile.experience = experience;
        }
        if let Some(qualification) = &self.qualification {
            profile.qualification.clone_from(qualification);
        }
        if let Some(expertise) = &self.expertise {
            profile.expertise.clone_from(expertise);
        }
        if let Some(hourly_rate) = self.hourly_rate {
            profile.hourly_rate = hourly_rate;
        }
    }
}

/// Field bundle used to construct a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Identity id.
    pub id: UserId,
    /// Display name.
    pub name: PersonName,
    /// Login email.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Profession; required iff `role` is professional.
    pub professional_type: Option<ProfessionalType>,
    /// Profile metadata.
    pub profile: UserProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A registered identity.
///
/// ## Invariants
/// - `professional_type` is `Some` exactly when `role` is
///   [`Role::Professional`].
/// - Profile numeric fields are never negative.
///
/// The password credential is not part of this type; it never leaves the
/// persistence layer except as an opaque hash during login verification.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(into = "UserDto")]
pub struct User {
    id: UserId,
    name: PersonName,
    email: Email,
    role: Role,
    professional_type: Option<ProfessionalType>,
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Validate and construct a [`User`] from a draft.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the role/profession pairing or
    /// the profile bounds are violated.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            name,
            email,
            role,
            professional_type,
            profile,
            created_at,
            updated_at,
        } = draft;

        match (role, professional_type) {
            (Role::Professional, None) => {
                return Err(UserValidationError::MissingProfessionalType);
            }
            (Role::User, Some(_)) => {
                return Err(UserValidationError::UnexpectedProfessionalType);
            }
            _ => {}
        }
        if profile.experience < 0 {
            return Err(UserValidationError::NegativeExperience);
        }
        if profile.hourly_rate < 0.0 {
            return Err(UserValidationError::NegativeHourlyRate);
        }
        if profile.rating < 0.0 {
            return Err(UserValidationError::NegativeRating);
        }

        Ok(Self {
            id,
            name,
            email,
            role,
            professional_type,
            profile,
            created_at,
            updated_at,
        })
    }

    /// Identity id.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Account role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Profession for professional accounts.
    #[must_use]
    pub fn professional_type(&self) -> Option<ProfessionalType> {
        self.professional_type
    }

    /// Profile metadata.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reduce to the public summary exposed in searches and expansions.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
            professional_type: self.professional_type,
        }
    }

    /// Replace the profile after a successful update.
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile, updated_at: DateTime<Utc>) -> Self {
        self.profile = profile;
        self.updated_at = updated_at;
        self
    }
}

/// Serialisation shape for [`User`]; never includes credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Identity id.
    pub id: UserId,
    /// Display name.
    pub name: PersonName,
    /// Login email.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Profession for professional accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<ProfessionalType>,
    /// Profile metadata, flattened alongside the identity fields.
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            professional_type: value.professional_type,
            profile: value.profile,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Public identity summary: id, name, role, and profession only.
///
/// This is the shape expanded into connection requests, search results, and
/// feed items. Email and profile fields never travel through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Identity id.
    pub id: UserId,
    /// Display name.
    pub name: PersonName,
    /// Account role.
    pub role: Role,
    /// Profession for professional accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<ProfessionalType>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn draft(role: Role, professional_type: Option<ProfessionalType>) -> UserDraft {
        UserDraft {
            id: UserId::random(),
            name: PersonName::new("Ada Lovelace").expect("valid name"),
            email: Email::new("ada@example.com").expect("valid email"),
            role,
            professional_type,
            profile: UserProfile::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("", false)]
    #[case("not-a-uuid", false)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", false)]
    fn user_id_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(UserId::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("Ada Lovelace", true)]
    #[case("J. R. O'Neill-Smith", true)]
    #[case("A", false)]
    #[case("  ", false)]
    #[case("Ada<script>", false)]
    #[case("9lives", false)]
    fn person_name_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PersonName::new(raw).is_ok(), ok);
    }

    #[test]
    fn person_name_trims_whitespace() {
        let name = PersonName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada Lovelace");
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("Ada@Example.COM", true)]
    #[case("no-at-sign", false)]
    #[case("missing-domain@", false)]
    #[case("spaces in@example.com", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Email::new(raw).is_ok(), ok);
    }

    #[test]
    fn email_lowercases() {
        let email = Email::new("Ada@Example.COM").expect("valid email");
        assert_eq!(email.as_ref(), "ada@example.com");
    }

    #[rstest]
    #[case("user", Some(Role::User))]
    #[case("professional", Some(Role::Professional))]
    #[case("Professional", None)]
    #[case("admin", None)]
    fn role_parsing(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(raw.parse::<Role>().ok(), expected);
    }

    #[rstest]
    #[case("Developer", Some(ProfessionalType::Developer))]
    #[case("developer", Some(ProfessionalType::Developer))]
    #[case("ELECTRICIAN", Some(ProfessionalType::Electrician))]
    #[case("astronaut", None)]
    fn professional_type_parses_case_insensitively(
        #[case] raw: &str,
        #[case] expected: Option<ProfessionalType>,
    ) {
        assert_eq!(ProfessionalType::parse_ci(raw), expected);
    }

    #[test]
    fn professional_requires_type() {
        let result = User::new(draft(Role::Professional, None));
        assert_eq!(result, Err(UserValidationError::MissingProfessionalType));
    }

    #[test]
    fn plain_user_rejects_type() {
        let result = User::new(draft(Role::User, Some(ProfessionalType::Plumber)));
        assert_eq!(result, Err(UserValidationError::UnexpectedProfessionalType));
    }

    #[test]
    fn negative_profile_fields_rejected() {
        let mut negative_experience = draft(Role::User, None);
        negative_experience.profile.experience = -1;
        assert_eq!(
            User::new(negative_experience),
            Err(UserValidationError::NegativeExperience)
        );

        let mut negative_rate = draft(Role::User, None);
        negative_rate.profile.hourly_rate = -0.5;
        assert_eq!(
            User::new(negative_rate),
            Err(UserValidationError::NegativeHourlyRate)
        );
    }

    #[rstest]
    #[case(ProfileChanges { experience: Some(-3), ..ProfileChanges::default() })]
    #[case(ProfileChanges { hourly_rate: Some(-1.0), ..ProfileChanges::default() })]
    fn profile_changes_validate_bounds(#[case] changes: ProfileChanges) {
        assert!(changes.validate().is_err());
    }

    #[test]
    fn profile_changes_apply_partially() {
        let mut profile = UserProfile {
            phone: "123".to_owned(),
            bio: "old bio".to_owned(),
            skills: vec!["carpentry".to_owned()],
            ..UserProfile::default()
        };
        let changes = ProfileChanges {
            bio: Some("new bio".to_owned()),
            experience: Some(4),
            ..ProfileChanges::default()
        };

        changes.apply_to(&mut profile);

        assert_eq!(profile.phone, "123");
        assert_eq!(profile.bio, "new bio");
        assert_eq!(profile.experience, 4);
        assert_eq!(profile.skills, vec!["carpentry".to_owned()]);
    }

    #[test]
    fn user_serialisation_omits_credentials_and_flattens_profile() {
        let user = User::new(draft(Role::Professional, Some(ProfessionalType::Developer)))
            .expect("valid user");
        let raw = serde_json::to_value(&user).expect("serialise user");

        assert_eq!(raw["professionalType"], "Developer");
        assert!(raw.get("password").is_none());
        assert!(raw.get("passwordHash").is_none());
        assert!(raw.get("hourlyRate").is_some());
    }

    #[test]
    fn summary_carries_public_fields_only() {
        let user = User::new(draft(Role::User, None)).expect("valid user");
        let summary = user.summary();
        let raw = serde_json::to_value(&summary).expect("serialise summary");

        assert_eq!(raw["name"], "Ada Lovelace");
        assert!(raw.get("email").is_none());
    }
}
