//! Connection request state machine and derived status views.
//!
//! A request is a directed row between two identities with an undirected
//! uniqueness rule: at most one row per unordered pair, whichever way it
//! points. Status moves from pending to accepted; rejected is reserved by
//! the enum but no exposed operation reaches it.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::{UserId, UserSummary};

/// Validation errors raised by connection constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionValidationError {
    /// The supplied request id was empty.
    EmptyId,
    /// The supplied request id was not a canonical UUID.
    InvalidId,
    /// Sender and receiver were the same identity.
    SelfConnection,
    /// The status string matched no known status.
    UnknownStatus,
}

impl fmt::Display for ConnectionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "connection request id must not be empty"),
            Self::InvalidId => write!(f, "connection request id must be a valid UUID"),
            Self::SelfConnection => write!(f, "cannot connect with yourself"),
            Self::UnknownStatus => {
                write!(f, "status must be 'pending', 'accepted', or 'rejected'")
            }
        }
    }
}

impl std::error::Error for ConnectionValidationError {}

/// Stable connection request identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionRequestId(Uuid, String);

// The `ToSchema` derive cannot apply `value_type`/`format` overrides to a
// multi-field tuple struct, so the declared schema (a UUID-formatted string)
// is implemented by hand.
impl utoipa::PartialSchema for ConnectionRequestId {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .format(Some(utoipa::openapi::SchemaFormat::KnownFormat(
                utoipa::openapi::KnownFormat::Uuid,
            )))
            .description(Some("Stable connection request identifier stored as a UUID."))
            .into()
    }
}

impl ToSchema for ConnectionRequestId {}

impl ConnectionRequestId {
    /// Validate and construct a [`ConnectionRequestId`] from borrowed input.
    ///
    /// # Errors
    /// Returns [`ConnectionValidationError`] when the input is empty or not a
    /// UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ConnectionValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`ConnectionRequestId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Construct a [`ConnectionRequestId`] from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, ConnectionValidationError> {
        if id.is_empty() {
            return Err(ConnectionValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ConnectionValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| ConnectionValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for ConnectionRequestId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for ConnectionRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for ConnectionRequestId {
    type Error = ConnectionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl From<ConnectionRequestId> for String {
    fn from(value: ConnectionRequestId) -> Self {
        let ConnectionRequestId(_, raw) = value;
        raw
    }
}

/// Lifecycle status of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Sent but not yet accepted.
    Pending,
    /// Accepted by the receiver; terminal in current flows.
    Accepted,
    /// Reserved; no exposed operation produces it.
    Rejected,
}

impl ConnectionStatus {
    /// Stable lowercase form used in storage and responses.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = ConnectionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ConnectionValidationError::UnknownStatus),
        }
    }
}

/// Field bundle used to construct a [`ConnectionRequest`].
#[derive(Debug, Clone)]
pub struct ConnectionDraft {
    /// Request id.
    pub id: ConnectionRequestId,
    /// Identity that sent the request.
    pub sender_id: UserId,
    /// Identity the request is addressed to.
    pub receiver_id: UserId,
    /// Current lifecycle status.
    pub status: ConnectionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A directed connection request between two identities.
///
/// ## Invariants
/// - `sender_id` and `receiver_id` are distinct.
/// - At most one request exists per unordered identity pair; the storage
///   layer enforces this with a pair-unique index and adapters surface the
///   violation as a duplicate error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    id: ConnectionRequestId,
    sender_id: UserId,
    receiver_id: UserId,
    status: ConnectionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConnectionRequest {
    /// Validate and construct a [`ConnectionRequest`] from a draft.
    ///
    /// # Errors
    /// Returns [`ConnectionValidationError::SelfConnection`] when sender and
    /// receiver are the same identity.
    pub fn new(draft: ConnectionDraft) -> Result<Self, ConnectionValidationError> {
        let ConnectionDraft {
            id,
            sender_id,
            receiver_id,
            status,
            created_at,
            updated_at,
        } = draft;

        if sender_id == receiver_id {
            return Err(ConnectionValidationError::SelfConnection);
        }

        Ok(Self {
            id,
            sender_id,
            receiver_id,
            status,
            created_at,
            updated_at,
        })
    }

    /// Request id.
    #[must_use]
    pub fn id(&self) -> &ConnectionRequestId {
        &self.id
    }

    /// Identity that sent the request.
    #[must_use]
    pub fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    /// Identity the request is addressed to.
    #[must_use]
    pub fn receiver_id(&self) -> &UserId {
        &self.receiver_id
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the given identity is the sender or the receiver.
    #[must_use]
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.sender_id == user_id || &self.receiver_id == user_id
    }

    /// The other party relative to `user_id`, or `None` for an outsider.
    #[must_use]
    pub fn counterpart_of(&self, user_id: &UserId) -> Option<&UserId> {
        if &self.sender_id == user_id {
            Some(&self.receiver_id)
        } else if &self.receiver_id == user_id {
            Some(&self.sender_id)
        } else {
            None
        }
    }

    /// Whether the request is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ConnectionStatus::Pending
    }

    /// Whether the request has been accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == ConnectionStatus::Accepted
    }

    /// Transition to accepted, recording the update time.
    ///
    /// Re-accepting an already accepted request rewrites the same status;
    /// callers treat that as a no-op rather than an error.
    #[must_use]
    pub fn accept(mut self, accepted_at: DateTime<Utc>) -> Self {
        self.status = ConnectionStatus::Accepted;
        self.updated_at = accepted_at;
        self
    }
}

/// A connection request with both parties expanded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    /// Request id.
    pub id: ConnectionRequestId,
    /// Expanded sender summary.
    pub sender: UserSummary,
    /// Expanded receiver summary.
    pub receiver: UserSummary,
    /// Current lifecycle status.
    pub status: ConnectionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ConnectionView {
    /// Combine a request with the resolved party summaries.
    #[must_use]
    pub fn from_parts(request: &ConnectionRequest, sender: UserSummary, receiver: UserSummary) -> Self {
        Self {
            id: request.id().clone(),
            sender,
            receiver,
            status: request.status(),
            created_at: request.created_at(),
            updated_at: request.updated_at(),
        }
    }
}

/// Derive the counterpart-to-status map for a viewing user.
///
/// Rows not involving the viewer are skipped. Absence of a counterpart key
/// means no request exists in either direction.
#[must_use]
pub fn derive_status_map(
    viewer_id: &UserId,
    requests: &[ConnectionRequest],
) -> HashMap<UserId, ConnectionStatus> {
    requests
        .iter()
        .filter_map(|request| {
            request
                .counterpart_of(viewer_id)
                .map(|counterpart| (counterpart.clone(), request.status()))
        })
        .collect()
}
