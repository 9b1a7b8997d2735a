//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and stay testable without I/O: tests build
//! the same state over fixture repositories.

use crate::domain::{AccountService, ConnectionService, PostService};
use crate::inbound::http::session::AuthTokens;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and profile operations.
    pub accounts: AccountService,
    /// Connection request workflow and account search.
    pub connections: ConnectionService,
    /// Post authoring and the feed.
    pub posts: PostService,
    /// Bearer-token signer and verifier.
    pub tokens: AuthTokens,
}

impl HttpState {
    /// Bundle the services and token keys handlers need.
    #[must_use]
    pub fn new(
        accounts: AccountService,
        connections: ConnectionService,
        posts: PostService,
        tokens: AuthTokens,
    ) -> Self {
        Self {
            accounts,
            connections,
            posts,
            tokens,
        }
    }
}
