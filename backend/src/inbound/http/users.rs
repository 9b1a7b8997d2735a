//! User profile endpoints.
//!
//! ```text
//! GET /api/v1/users/{id}
//! PUT /api/v1/users/{id} {"bio":"Rust and timber","experience":4}
//! ```

use actix_web::{get, put, web};

use crate::domain::{Error, ProfileChanges, UserDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::AuthedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

const USER_ID_FIELD: FieldName = FieldName::new("id");

/// Fetch an account with its profile.
///
/// Any authenticated caller may read any profile; the password credential is
/// not part of the serialised shape.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Account with profile", body = UserDto),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such account", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("BearerToken" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _caller: AuthedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDto>> {
    let id = parse_user_id(&path.into_inner(), USER_ID_FIELD)?;
    let user = state.accounts.get_user(&id).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Update the caller's own profile.
///
/// Absent fields keep their stored value. The rating field is not editable
/// through this endpoint and unknown fields are rejected outright.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = ProfileChanges,
    responses(
        (status = 200, description = "Updated account", body = UserDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Attempted to edit another account", body = Error),
        (status = 404, description = "No such account", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("BearerToken" = []))
)]
#[put("/users/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthedUser,
    path: web::Path<String>,
    payload: web::Json<ProfileChanges>,
) -> ApiResult<web::Json<UserDto>> {
    let target = parse_user_id(&path.into_inner(), USER_ID_FIELD)?;
    let changes = payload.into_inner();
    let user = state
        .accounts
        .update_profile(&caller.user_id, &target, &changes)
        .await?;
    Ok(web::Json(UserDto::from(user)))
}
