//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureConnectionRepository, FixtureImageStore, FixturePostRepository, FixtureUserRepository,
};
use crate::domain::{
    AccountService, ConnectionService, Email, Password, PersonName, PostService, ProfessionalType,
    Role, SignupForm, User,
};
use crate::inbound::http::session::AuthTokens;
use crate::inbound::http::state::HttpState;

/// Signing secret shared by every test-built state.
pub const TEST_TOKEN_SECRET: &str = "test-secret";

/// Password used for accounts registered through [`signup_user`].
pub const TEST_PASSWORD: &str = "hunter42";

/// Build an [`HttpState`] over in-memory fixture repositories.
pub fn fixture_state() -> HttpState {
    let users = Arc::new(FixtureUserRepository::default());
    let connections = Arc::new(FixtureConnectionRepository::default());
    let posts = Arc::new(FixturePostRepository::default());
    let images = Arc::new(FixtureImageStore::default());

    HttpState::new(
        AccountService::new(users.clone()),
        ConnectionService::new(connections.clone(), users.clone()),
        PostService::new(posts, connections, users, images),
        AuthTokens::new(TEST_TOKEN_SECRET),
    )
}

/// Register an account directly through the service, skipping the endpoint.
pub async fn signup_user(
    state: &HttpState,
    name: &str,
    email: &str,
    role: Role,
    professional_type: Option<ProfessionalType>,
) -> User {
    state
        .accounts
        .signup(SignupForm {
            name: PersonName::new(name).expect("valid name"),
            email: Email::new(email).expect("valid email"),
            password: Password::new(TEST_PASSWORD).expect("valid password"),
            role,
            professional_type,
        })
        .await
        .expect("signup succeeds")
}

/// `Authorization` header value identifying `user`.
pub fn bearer_for(state: &HttpState, user: &User) -> String {
    let token = state.tokens.issue(user).expect("token issued");
    format!("Bearer {token}")
}
