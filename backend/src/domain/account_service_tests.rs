//! Regression coverage for the account service.

use std::sync::Arc;

use rstest::rstest;

use crate::domain::auth::{LoginCredentials, Password};
use crate::domain::error::ErrorCode;
use crate::domain::ports::FixtureUserRepository;
use crate::domain::user::{Email, PersonName, ProfessionalType, ProfileChanges, Role, UserId};

use super::{AccountService, SignupForm};

fn service() -> AccountService {
    AccountService::new(Arc::new(FixtureUserRepository::default()))
}

fn form(email: &str, role: Role, professional_type: Option<ProfessionalType>) -> SignupForm {
    SignupForm {
        name: PersonName::new("Jordan Rivers").expect("valid name"),
        email: Email::new(email).expect("valid email"),
        password: Password::new("hunter-42").expect("valid password"),
        role,
        professional_type,
    }
}

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, password).expect("valid credentials")
}

#[tokio::test]
async fn signup_then_login_round_trips() {
    let service = service();
    service
        .signup(form("jordan@example.com", Role::User, None))
        .await
        .expect("signup succeeds");

    let user = service
        .login(&credentials("jordan@example.com", "hunter-42"), Role::User)
        .await
        .expect("login succeeds");
    assert_eq!(user.email().as_ref(), "jordan@example.com");
}

#[tokio::test]
async fn professional_signup_requires_a_trade() {
    let error = service()
        .signup(form("pro@example.com", Role::Professional, None))
        .await
        .expect_err("missing trade must fail");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Professional type is required");
}

#[tokio::test]
async fn plain_signup_discards_a_stray_trade() {
    let user = service()
        .signup(form(
            "plain@example.com",
            Role::User,
            Some(ProfessionalType::Developer),
        ))
        .await
        .expect("signup succeeds");
    assert_eq!(user.professional_type(), None);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let service = service();
    service
        .signup(form("taken@example.com", Role::User, None))
        .await
        .expect("first signup succeeds");

    let error = service
        .signup(form("taken@example.com", Role::User, None))
        .await
        .expect_err("second signup must fail");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "User already exists");
}

#[rstest]
#[case::unknown_email("ghost@example.com", "hunter-42")]
#[case::wrong_password("jordan@example.com", "not-the-password")]
#[tokio::test]
async fn bad_credentials_are_unauthorized(#[case] email: &str, #[case] password: &str) {
    let service = service();
    service
        .signup(form("jordan@example.com", Role::User, None))
        .await
        .expect("signup succeeds");

    let error = service
        .login(&credentials(email, password), Role::User)
        .await
        .expect_err("login must fail");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid credentials");
}

#[tokio::test]
async fn role_mismatch_names_the_registered_role() {
    let service = service();
    service
        .signup(form(
            "pro@example.com",
            Role::Professional,
            Some(ProfessionalType::Plumber),
        ))
        .await
        .expect("signup succeeds");

    let error = service
        .login(&credentials("pro@example.com", "hunter-42"), Role::User)
        .await
        .expect_err("role mismatch must fail");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "You are registered as professional");
}

#[tokio::test]
async fn get_user_reports_unknown_accounts() {
    let error = service()
        .get_user(&UserId::random())
        .await
        .expect_err("unknown id must fail");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found");
}

#[tokio::test]
async fn profile_edits_are_owner_only() {
    let service = service();
    let owner = service
        .signup(form("owner@example.com", Role::User, None))
        .await
        .expect("signup succeeds");
    let intruder = service
        .signup(form("intruder@example.com", Role::User, None))
        .await
        .expect("signup succeeds");

    let error = service
        .update_profile(intruder.id(), owner.id(), &ProfileChanges::default())
        .await
        .expect_err("edit by another account must fail");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "You can only update your own profile");
}

#[tokio::test]
async fn profile_edits_merge_into_stored_state() {
    let service = service();
    let user = service
        .signup(form(
            "edit@example.com",
            Role::Professional,
            Some(ProfessionalType::Carpenter),
        ))
        .await
        .expect("signup succeeds");

    let first = ProfileChanges {
        bio: Some("Restores sash windows.".to_owned()),
        hourly_rate: Some(55.0),
        ..ProfileChanges::default()
    };
    service
        .update_profile(user.id(), user.id(), &first)
        .await
        .expect("first edit succeeds");

    let second = ProfileChanges {
        experience: Some(12),
        ..ProfileChanges::default()
    };
    let updated = service
        .update_profile(user.id(), user.id(), &second)
        .await
        .expect("second edit succeeds");

    assert_eq!(updated.profile().bio, "Restores sash windows.");
    assert_eq!(updated.profile().hourly_rate, 55.0);
    assert_eq!(updated.profile().experience, 12);
}

#[tokio::test]
async fn profile_edits_reject_negative_numbers() {
    let service = service();
    let user = service
        .signup(form("bounds@example.com", Role::User, None))
        .await
        .expect("signup succeeds");

    let changes = ProfileChanges {
        experience: Some(-3),
        ..ProfileChanges::default()
    };
    let error = service
        .update_profile(user.id(), user.id(), &changes)
        .await
        .expect_err("negative experience must fail");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn professionals_lookup_is_case_insensitive() {
    let service = service();
    service
        .signup(form(
            "dev@example.com",
            Role::Professional,
            Some(ProfessionalType::Developer),
        ))
        .await
        .expect("signup succeeds");
    service
        .signup(form(
            "teach@example.com",
            Role::Professional,
            Some(ProfessionalType::Teacher),
        ))
        .await
        .expect("signup succeeds");

    let matches = service
        .professionals("DeVeLoPeR")
        .await
        .expect("lookup succeeds");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].email().as_ref(), "dev@example.com");
}

#[tokio::test]
async fn unknown_trade_yields_an_empty_list() {
    let matches = service()
        .professionals("astronaut")
        .await
        .expect("lookup succeeds");
    assert!(matches.is_empty());
}
