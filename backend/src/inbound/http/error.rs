//! HTTP mapping for domain errors.
//!
//! The domain error type knows nothing about HTTP; this module gives it a
//! status code and a JSON body so handlers can return it directly with `?`.
//! Internal errors are redacted before they leave the process, keeping the
//! trace id so operators can still find the full record in the logs.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::json;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    async fn response_payload(error: &Error) -> (StatusCode, Error) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body())
            .await
            .expect("read response body");
        let payload = serde_json::from_slice(&bytes).expect("error body is valid JSON");
        (status, payload)
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), expected);
    }

    #[actix_web::test]
    async fn client_errors_pass_through_message_and_details() {
        let error = Error::invalid_request("bad")
            .with_trace_id(TRACE_ID)
            .with_details(json!({"field": "email"}));

        let (status, payload) = response_payload(&error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload.message(), "bad");
        assert_eq!(payload.details(), Some(&json!({"field": "email"})));
        assert_eq!(payload.trace_id(), Some(TRACE_ID));
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted_but_keep_the_trace_id() {
        let error = Error::internal("database password rejected")
            .with_trace_id(TRACE_ID)
            .with_details(json!({"dsn": "postgres://secret"}));

        let response = error.error_response();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header set")
            .to_str()
            .expect("ascii header")
            .to_owned();
        assert_eq!(header, TRACE_ID);

        let (status, payload) = response_payload(&error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload.message(), "Internal server error");
        assert!(payload.details().is_none());
        assert_eq!(payload.trace_id(), Some(TRACE_ID));
    }

    #[actix_web::test]
    async fn missing_trace_id_omits_the_header() {
        let error = Error::not_found("missing");
        let response = error.error_response();
        assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    }

    #[test]
    fn actix_errors_become_redacted_internal_errors() {
        let source = actix_web::error::ErrorBadRequest("payload mangled");
        let error: Error = source.into();

        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(error.message(), "Internal server error");
        assert!(error.details().is_none());
    }
}
