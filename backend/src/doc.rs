//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, users,
//!   connections, posts, health)
//! - **Schemas**: The wire types handlers accept and return
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::domain::{
    ConnectionStatus, ConnectionView, Error, ErrorCode, FeedItem, ProfessionalType, ProfileChanges,
    Role, UserDto, UserProfile, UserSummary,
};
use crate::inbound::http::auth::{
    AuthenticatedUser, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
};
use crate::inbound::http::connections::SearchQuery;
use crate::inbound::http::posts::CreatePostRequest;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Workwise backend API",
        description = "HTTP interface for accounts, connections, posts, and health probes.",
        license(
            name = "ISC",
            url = "https://opensource.org/licenses/ISC"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::connections::send_request,
        crate::inbound::http::connections::accept_request,
        crate::inbound::http::connections::my_connections,
        crate::inbound::http::connections::status_map,
        crate::inbound::http::connections::search,
        crate::inbound::http::connections::professionals_by_role,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::feed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        LoginRequest,
        LoginResponse,
        AuthenticatedUser,
        UserDto,
        UserProfile,
        UserSummary,
        Role,
        ProfessionalType,
        ProfileChanges,
        ConnectionView,
        ConnectionStatus,
        SearchQuery,
        CreatePostRequest,
        FeedItem,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Account registration and login"),
        (name = "users", description = "Profile reads and updates"),
        (name = "connections", description = "Connection requests and account search"),
        (name = "posts", description = "Post authoring and the feed"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
