//! Signup and login endpoints.
//!
//! ```text
//! POST /api/v1/auth/signup {"name":"Ada Lovelace","email":"ada@example.com",
//!                           "password":"hunter42","role":"user"}
//! POST /api/v1/auth/login  {"email":"ada@example.com","password":"hunter42",
//!                           "role":"user"}
//! ```
//!
//! Login returns a bearer token plus a trimmed account projection; the full
//! profile is fetched separately through `GET /api/v1/users/{id}`.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Email, Error, LoginCredentials, LoginValidationError, Password, PersonName, ProfessionalType,
    Role, SignupForm, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

const NAME_FIELD: FieldName = FieldName::new("name");
const EMAIL_FIELD: FieldName = FieldName::new("email");
const PASSWORD_FIELD: FieldName = FieldName::new("password");
const ROLE_FIELD: FieldName = FieldName::new("role");
const PROFESSIONAL_TYPE_FIELD: FieldName = FieldName::new("professionalType");

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `user` or `professional`.
    pub role: String,
    /// Trade name; required when `role` is `professional`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<String>,
}

impl TryFrom<SignupRequest> for SignupForm {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        let name = PersonName::new(&value.name)
            .map_err(|err| invalid_value_error(NAME_FIELD, err.to_string()))?;
        let email = Email::new(&value.email)
            .map_err(|err| invalid_value_error(EMAIL_FIELD, err.to_string()))?;
        let password = Password::new(value.password)
            .map_err(|err| invalid_value_error(PASSWORD_FIELD, err.to_string()))?;
        let role = value
            .role
            .parse::<Role>()
            .map_err(|err| invalid_value_error(ROLE_FIELD, err.to_string()))?;
        let professional_type = value
            .professional_type
            .as_deref()
            .map(|raw| {
                raw.parse::<ProfessionalType>()
                    .map_err(|err| invalid_value_error(PROFESSIONAL_TYPE_FIELD, err.to_string()))
            })
            .transpose()?;

        Ok(SignupForm {
            name,
            email,
            password,
            role,
            professional_type,
        })
    }
}

/// Body returned by a successful signup.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupResponse {
    pub message: String,
}

/// Login request body for `POST /api/v1/auth/login`.
///
/// The role is part of the credentials: logging into an account registered
/// under the other role fails rather than silently switching surface.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Trimmed account projection embedded in the login response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: PersonName,
    pub email: Email,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_type: Option<ProfessionalType>,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            name: user.name().clone(),
            email: user.email().clone(),
            role: user.role(),
            professional_type: user.professional_type(),
        }
    }
}

/// Body returned by a successful login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let form = SignupForm::try_from(payload.into_inner())?;
    state.accounts.signup(form).await?;
    Ok(HttpResponse::Created().json(SignupResponse {
        message: "Account created successfully".to_owned(),
    }))
}

/// Authenticate and receive a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account registered under the other role", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest {
        email,
        password,
        role,
    } = payload.into_inner();
    let role = role
        .parse::<Role>()
        .map_err(|err| invalid_value_error(ROLE_FIELD, err.to_string()))?;
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(map_login_validation_error)?;

    let user = state.accounts.login(&credentials, role).await?;
    let token = state.tokens.issue(&user)?;
    Ok(web::Json(LoginResponse {
        token,
        user: AuthenticatedUser::from(&user),
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => invalid_value_error(EMAIL_FIELD, err.to_string()),
        LoginValidationError::EmptyPassword => {
            invalid_value_error(PASSWORD_FIELD, err.to_string())
        }
    }
}
