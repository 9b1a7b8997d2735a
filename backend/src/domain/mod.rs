//! Domain primitives, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports those layers implement, and the application
//! services that coordinate them. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, UserSummary, Role, ProfessionalType: identity aggregate.
//! - ConnectionRequest, ConnectionStatus, ConnectionView: connection graph.
//! - Post, FeedItem, ImageRef: post store and feed projections.
//! - AccountService, ConnectionService, PostService: application services.
//! - TraceId: request correlation id.

pub mod account_service;
pub mod auth;
pub mod connection;
pub mod connection_service;
pub mod error;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, SignupForm};
pub use self::auth::{CredentialError, LoginCredentials, LoginValidationError, Password};
pub use self::connection::{
    ConnectionDraft, ConnectionRequest, ConnectionRequestId, ConnectionStatus,
    ConnectionValidationError, ConnectionView, derive_status_map,
};
pub use self::connection_service::ConnectionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::post::{
    FeedItem, ImageRef, Post, PostContent, PostDraft, PostId, PostValidationError,
};
pub use self::post_service::{ImageUpload, PostService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, PersonName, ProfessionalType, ProfileChanges, Role, User, UserDraft, UserDto, UserId,
    UserProfile, UserSummary, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
