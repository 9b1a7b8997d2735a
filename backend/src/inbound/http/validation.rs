//! Shared validation helpers for the HTTP adapter.
//!
//! Failures carry a machine-readable `details` object naming the offending
//! field, so clients can highlight the right input without parsing prose.

use serde_json::json;

use crate::domain::{ConnectionRequestId, Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
    )
}

/// Wrap a newtype constructor failure with the field it belongs to.
pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field, message, ErrorCode::InvalidValue)
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a path or payload segment into a [`UserId`].
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a path segment into a [`ConnectionRequestId`].
pub(crate) fn parse_request_id(
    value: &str,
    field: FieldName,
) -> Result<ConnectionRequestId, Error> {
    ConnectionRequestId::new(value).map_err(|_| invalid_uuid_error(field, value))
}
