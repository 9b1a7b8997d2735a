//! Port abstraction for connection request persistence adapters.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::connection::{ConnectionRequest, ConnectionRequestId};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Persistence errors raised by connection repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionPersistenceError {
    /// Repository connection could not be established.
    #[error("connection repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("connection repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// A request already exists between the pair, in either direction.
    #[error("a request already exists between this pair")]
    DuplicatePair,
}

impl ConnectionPersistenceError {
    /// Build a [`ConnectionPersistenceError::Connection`] from any message type.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`ConnectionPersistenceError::Query`] from any message type.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<ConnectionPersistenceError> for Error {
    fn from(error: ConnectionPersistenceError) -> Self {
        match error {
            ConnectionPersistenceError::DuplicatePair => Error::conflict("Request already exists"),
            ConnectionPersistenceError::Connection { .. } => {
                Error::service_unavailable("service temporarily unavailable")
            }
            ConnectionPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for connection request storage and lookups.
///
/// Inserts enforce undirected pair uniqueness: adapters surface a competing
/// row in either direction as [`ConnectionPersistenceError::DuplicatePair`],
/// which keeps the check-then-insert race harmless.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Insert a new pending request.
    async fn insert(&self, request: &ConnectionRequest) -> Result<(), ConnectionPersistenceError>;

    /// Fetch a request by id.
    async fn find_by_id(
        &self,
        id: &ConnectionRequestId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError>;

    /// Fetch the request between two identities, whichever way it points.
    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError>;

    /// List every request where the identity is sender or receiver.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, ConnectionPersistenceError>;

    /// Mark a request accepted, returning the refreshed row.
    ///
    /// The only transition the state machine exposes; re-accepting rewrites
    /// the same status. Returns `Ok(None)` when no request has the given id.
    async fn mark_accepted(
        &self,
        id: &ConnectionRequestId,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError>;

    /// Ids of everyone holding an accepted connection with the identity.
    async fn accepted_counterpart_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, ConnectionPersistenceError>;
}

/// In-memory implementation backing tests and the no-database server mode.
#[derive(Debug, Default)]
pub struct FixtureConnectionRepository {
    store: Mutex<HashMap<ConnectionRequestId, ConnectionRequest>>,
}

impl FixtureConnectionRepository {
    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<ConnectionRequestId, ConnectionRequest>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ConnectionRepository for FixtureConnectionRepository {
    async fn insert(&self, request: &ConnectionRequest) -> Result<(), ConnectionPersistenceError> {
        let mut guard = self.lock();
        let pair_taken = guard.values().any(|existing| {
            existing.involves(request.sender_id()) && existing.involves(request.receiver_id())
        });
        if pair_taken {
            return Err(ConnectionPersistenceError::DuplicatePair);
        }
        guard.insert(request.id().clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConnectionRequestId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        Ok(self
            .lock()
            .values()
            .find(|request| request.involves(a) && request.involves(b))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, ConnectionPersistenceError> {
        Ok(self
            .lock()
            .values()
            .filter(|request| request.involves(user_id))
            .cloned()
            .collect())
    }

    async fn mark_accepted(
        &self,
        id: &ConnectionRequestId,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        let mut guard = self.lock();
        let Some(request) = guard.get_mut(id) else {
            return Ok(None);
        };
        *request = request.clone().accept(accepted_at);
        Ok(Some(request.clone()))
    }

    async fn accepted_counterpart_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, ConnectionPersistenceError> {
        Ok(self
            .lock()
            .values()
            .filter(|request| request.is_accepted())
            .filter_map(|request| request.counterpart_of(user_id).cloned())
            .collect())
    }
}
