//! Bearer-token authentication for HTTP handlers.
//!
//! Login hands out a signed JWT; every protected handler takes an
//! [`AuthedUser`] argument, which extracts and verifies the `Authorization`
//! header before the handler body runs. Handlers never see the raw token.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role, User, UserId};
use crate::inbound::http::state::HttpState;

/// How long an issued token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
}

/// Signs and verifies the bearer tokens handed out at login.
///
/// Both keys derive from one shared secret; the secret itself is dropped once
/// the keys are built.
#[derive(Clone)]
pub struct AuthTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthTokens {
    /// Build a signer/verifier pair from a shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token identifying `user`, valid for [`TOKEN_TTL_DAYS`].
    ///
    /// # Errors
    /// Returns an internal error when signing fails.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let expires_at = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
        let exp = usize::try_from(expires_at.timestamp())
            .map_err(|_| Error::internal("token expiry predates the epoch"))?;
        let claims = Claims {
            sub: user.id().to_string(),
            role: user.role().as_str().to_owned(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| Error::internal(format!("failed to sign token: {error}")))
    }

    /// Verify a token and recover the caller it identifies.
    ///
    /// # Errors
    /// Returns `unauthorized` for expired, tampered, or malformed tokens. The
    /// message distinguishes expiry so clients know to log in again.
    pub fn verify(&self, token: &str) -> Result<AuthedUser, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => Error::unauthorized("Token expired"),
                _ => Error::unauthorized("Invalid token"),
            })?;
        let user_id =
            UserId::new(&data.claims.sub).map_err(|_| Error::unauthorized("Invalid token"))?;
        let role = data
            .claims
            .role
            .parse::<Role>()
            .map_err(|_| Error::unauthorized("Invalid token"))?;
        Ok(AuthedUser { user_id, role })
    }
}

/// The verified caller of a protected endpoint.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    /// Identity the token was issued to.
    pub user_id: UserId,
    /// Role recorded in the token at login time.
    pub role: Role,
}

impl FromRequest for AuthedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tokens = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.tokens.clone());
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Box::pin(async move {
            let Some(tokens) = tokens else {
                return Err(Error::internal("token verifier not configured").into());
            };
            let token = authorization
                .as_deref()
                .and_then(|value| value.strip_prefix("Bearer "))
                .ok_or_else(|| Error::unauthorized("Authentication required"))?;
            Ok(tokens.verify(token)?)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    // Aliased so the bare `#[test]` attribute below keeps resolving to the
    // built-in test macro rather than `actix_web::test`.
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    use crate::inbound::http::test_utils::{fixture_state, signup_user};

    fn tokens() -> AuthTokens {
        AuthTokens::new("test-secret")
    }

    async fn issued_token() -> (String, UserId) {
        let state = fixture_state();
        let user = signup_user(&state, "Ada Lovelace", "ada@example.com", Role::User, None).await;
        let token = state.tokens.issue(&user).expect("token issued");
        (token, user.id().clone())
    }

    fn stale_token(secret: &str, sub: &str, role: &str) -> String {
        let claims = Claims {
            sub: sub.to_owned(),
            role: role.to_owned(),
            exp: usize::try_from(Utc::now().timestamp() - 10_000).expect("past timestamp"),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token encoded")
    }

    #[actix_web::test]
    async fn issue_then_verify_round_trips() {
        let state = fixture_state();
        let user = signup_user(
            &state,
            "Bob Builder",
            "bob@example.com",
            Role::Professional,
            Some(crate::domain::ProfessionalType::Carpenter),
        )
        .await;

        let token = state.tokens.issue(&user).expect("token issued");
        let authed = state.tokens.verify(&token).expect("token verifies");

        assert_eq!(&authed.user_id, user.id());
        assert_eq!(authed.role, Role::Professional);
    }

    #[test]
    fn expired_tokens_are_rejected_by_name() {
        let token = stale_token("test-secret", &UserId::random().to_string(), "user");
        let err = tokens().verify(&token).expect_err("expired token fails");
        assert_eq!(err.message(), "Token expired");
    }

    #[rstest]
    #[case::garbage("not-a-token")]
    #[case::empty("")]
    fn malformed_tokens_are_rejected(#[case] raw: &str) {
        let err = tokens().verify(raw).expect_err("malformed token fails");
        assert_eq!(err.message(), "Invalid token");
    }

    #[actix_web::test]
    async fn tokens_signed_with_another_secret_are_rejected() {
        let (token, _) = issued_token().await;
        let err = AuthTokens::new("other-secret")
            .verify(&token)
            .expect_err("foreign token fails");
        assert_eq!(err.message(), "Invalid token");
    }

    #[actix_web::test]
    async fn claims_naming_an_unknown_role_are_rejected() {
        let state = fixture_state();
        let claims = Claims {
            sub: UserId::random().to_string(),
            role: "superuser".to_owned(),
            exp: usize::try_from(Utc::now().timestamp() + 3_600).expect("future timestamp"),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .expect("token encoded");
        // fixture_state signs with the same test secret
        let err = state.tokens.verify(&token).expect_err("unknown role fails");
        assert_eq!(err.message(), "Invalid token");
    }

    async fn extractor_response(authorization: Option<&str>) -> StatusCode {
        let state = fixture_state();
        let user = signup_user(&state, "Ada Lovelace", "ada@example.com", Role::User, None).await;
        let token = state.tokens.issue(&user).expect("token issued");

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route(
                    "/whoami",
                    web::get().to(|caller: AuthedUser| async move {
                        HttpResponse::Ok().body(caller.user_id.to_string())
                    }),
                ),
        )
        .await;

        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = authorization {
            let value = value.replace("{token}", &token);
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        actix_test::call_service(&app, req.to_request()).await.status()
    }

    #[actix_web::test]
    async fn extractor_accepts_a_valid_bearer_token() {
        assert_eq!(extractor_response(Some("Bearer {token}")).await, StatusCode::OK);
    }

    #[actix_web::test]
    async fn extractor_rejects_a_missing_header() {
        assert_eq!(extractor_response(None).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn extractor_rejects_a_non_bearer_scheme() {
        assert_eq!(
            extractor_response(Some("Basic {token}")).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
