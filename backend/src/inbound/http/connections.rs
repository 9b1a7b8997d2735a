//! Connection request endpoints.
//!
//! A connection starts as a pending request from one account to another and
//! becomes mutual once the receiver accepts it. At most one request exists per
//! pair of accounts, whichever direction it was sent in.

use std::collections::HashMap;

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ConnectionStatus, ConnectionView, Error, UserDto, UserId, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::AuthedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_request_id, parse_user_id};

const RECEIVER_ID_FIELD: FieldName = FieldName::new("receiver_id");
const REQUEST_ID_FIELD: FieldName = FieldName::new("request_id");

/// Query parameters for the people search.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SearchQuery {
    /// Case-insensitive fragment matched against names and trades. Absent or
    /// blank keywords yield an empty result rather than the full directory.
    pub keyword: Option<String>,
}

/// Send a pending connection request to another account.
#[utoipa::path(
    post,
    path = "/api/v1/connections/send/{receiver_id}",
    params(("receiver_id" = String, Path, description = "Receiving user identifier")),
    responses(
        (status = 201, description = "Pending request created", body = ConnectionView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such account", body = Error),
        (status = 409, description = "A request already exists between the pair", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "sendConnectionRequest",
    security(("BearerToken" = []))
)]
#[post("/connections/send/{receiver_id}")]
pub async fn send_request(
    state: web::Data<HttpState>,
    caller: AuthedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let receiver = parse_user_id(&path.into_inner(), RECEIVER_ID_FIELD)?;
    let view = state
        .connections
        .send_request(&caller.user_id, &receiver)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// Accept a pending request addressed to the caller.
///
/// Accepting a request that is already accepted returns the current state
/// unchanged, so retried clients see a stable outcome.
#[utoipa::path(
    put,
    path = "/api/v1/connections/accept/{request_id}",
    params(("request_id" = String, Path, description = "Connection request identifier")),
    responses(
        (status = 200, description = "Request accepted", body = ConnectionView),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not the receiver", body = Error),
        (status = 404, description = "No such request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "acceptConnectionRequest",
    security(("BearerToken" = []))
)]
#[put("/connections/accept/{request_id}")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    caller: AuthedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ConnectionView>> {
    let request_id = parse_request_id(&path.into_inner(), REQUEST_ID_FIELD)?;
    let view = state
        .connections
        .accept_request(&request_id, &caller.user_id)
        .await?;
    Ok(web::Json(view))
}

/// List every request involving the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/connections/my",
    responses(
        (status = 200, description = "Requests involving the caller", body = [ConnectionView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "listMyConnections",
    security(("BearerToken" = []))
)]
#[get("/connections/my")]
pub async fn my_connections(
    state: web::Data<HttpState>,
    caller: AuthedUser,
) -> ApiResult<web::Json<Vec<ConnectionView>>> {
    let views = state.connections.list_for(&caller.user_id).await?;
    Ok(web::Json(views))
}

/// Map each counterpart account to the status of the request shared with the
/// caller. Accounts with no request in either direction are absent.
#[utoipa::path(
    get,
    path = "/api/v1/connections/status-map",
    responses(
        (status = 200, description = "Counterpart id to request status", body = HashMap<String, ConnectionStatus>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "connectionStatusMap",
    security(("BearerToken" = []))
)]
#[get("/connections/status-map")]
pub async fn status_map(
    state: web::Data<HttpState>,
    caller: AuthedUser,
) -> ApiResult<web::Json<HashMap<UserId, ConnectionStatus>>> {
    let map = state.connections.status_map(&caller.user_id).await?;
    Ok(web::Json(map))
}

/// Search other accounts by name or trade.
#[utoipa::path(
    get,
    path = "/api/v1/connections/search",
    params(("keyword" = Option<String>, Query, description = "Fragment matched against names and trades")),
    responses(
        (status = 200, description = "Matching accounts, never including the caller", body = [UserSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "searchUsers",
    security(("BearerToken" = []))
)]
#[get("/connections/search")]
pub async fn search(
    state: web::Data<HttpState>,
    caller: AuthedUser,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    let keyword = query.into_inner().keyword.unwrap_or_default();
    let matches = state
        .connections
        .search_users(&caller.user_id, &keyword)
        .await?;
    Ok(web::Json(matches))
}

/// Public directory of professionals practising the given trade.
///
/// Unknown trades yield an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/v1/connections/profession/{role}",
    params(("role" = String, Path, description = "Trade name, matched ignoring case")),
    responses(
        (status = 200, description = "Professionals practising the trade", body = [UserDto]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "listProfessionalsByRole",
    security([])
)]
#[get("/connections/profession/{role}")]
pub async fn professionals_by_role(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserDto>>> {
    let users = state.accounts.professionals(&path.into_inner()).await?;
    Ok(web::Json(users.into_iter().map(UserDto::from).collect()))
}

#[cfg(test)]
#[path = "connections_tests.rs"]
mod tests;
