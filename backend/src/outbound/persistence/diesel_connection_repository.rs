//! PostgreSQL-backed `ConnectionRepository` implementation using Diesel ORM.
//!
//! Pair uniqueness is enforced by a database index over the unordered id
//! pair, so a competing insert in either direction surfaces as a unique
//! violation rather than a racy read-then-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ConnectionPersistenceError, ConnectionRepository};
use crate::domain::{
    ConnectionDraft, ConnectionRequest, ConnectionRequestId, ConnectionStatus, UserId,
};

use super::models::{ConnectionRequestRow, NewConnectionRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::connection_requests;

/// Diesel-backed implementation of the `ConnectionRepository` port.
#[derive(Clone)]
pub struct DieselConnectionRepository {
    pool: DbPool,
}

impl DieselConnectionRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ConnectionPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ConnectionPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ConnectionPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ConnectionPersistenceError::connection("database connection error")
        }
        _ => ConnectionPersistenceError::query("database error"),
    }
}

/// Insert failures additionally watch for the unordered-pair unique index.
fn map_insert_error(error: diesel::result::Error) -> ConnectionPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return ConnectionPersistenceError::DuplicatePair;
    }
    map_diesel_error(error)
}

fn invalid_row(detail: impl std::fmt::Display) -> ConnectionPersistenceError {
    ConnectionPersistenceError::query(format!("stored request failed validation: {detail}"))
}

fn row_to_request(row: ConnectionRequestRow) -> Result<ConnectionRequest, ConnectionPersistenceError> {
    let status = row.status.parse::<ConnectionStatus>().map_err(invalid_row)?;
    ConnectionRequest::new(ConnectionDraft {
        id: ConnectionRequestId::from_uuid(row.id),
        sender_id: UserId::from_uuid(row.sender_id),
        receiver_id: UserId::from_uuid(row.receiver_id),
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(invalid_row)
}

fn new_request_row(request: &ConnectionRequest) -> NewConnectionRequestRow<'_> {
    NewConnectionRequestRow {
        id: *request.id().as_uuid(),
        sender_id: *request.sender_id().as_uuid(),
        receiver_id: *request.receiver_id().as_uuid(),
        status: request.status().as_str(),
        created_at: request.created_at(),
        updated_at: request.updated_at(),
    }
}

#[async_trait]
impl ConnectionRepository for DieselConnectionRepository {
    async fn insert(&self, request: &ConnectionRequest) -> Result<(), ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = new_request_row(request);
        diesel::insert_into(connection_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_id(
        &self,
        id: &ConnectionRequestId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ConnectionRequestRow> = connection_requests::table
            .find(id.as_uuid())
            .select(ConnectionRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let forward = connection_requests::sender_id
            .eq(a.as_uuid())
            .and(connection_requests::receiver_id.eq(b.as_uuid()));
        let backward = connection_requests::sender_id
            .eq(b.as_uuid())
            .and(connection_requests::receiver_id.eq(a.as_uuid()));
        let row: Option<ConnectionRequestRow> = connection_requests::table
            .filter(forward.or(backward))
            .select(ConnectionRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ConnectionRequestRow> = connection_requests::table
            .filter(
                connection_requests::sender_id
                    .eq(user_id.as_uuid())
                    .or(connection_requests::receiver_id.eq(user_id.as_uuid())),
            )
            .order(connection_requests::created_at.desc())
            .select(ConnectionRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_request).collect()
    }

    async fn mark_accepted(
        &self,
        id: &ConnectionRequestId,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<ConnectionRequest>, ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(connection_requests::table.find(id.as_uuid()))
            .set((
                connection_requests::status.eq(ConnectionStatus::Accepted.as_str()),
                connection_requests::updated_at.eq(accepted_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Ok(None);
        }

        let row: Option<ConnectionRequestRow> = connection_requests::table
            .find(id.as_uuid())
            .select(ConnectionRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn accepted_counterpart_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, ConnectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let me = *user_id.as_uuid();
        let pairs: Vec<(Uuid, Uuid)> = connection_requests::table
            .filter(connection_requests::status.eq(ConnectionStatus::Accepted.as_str()))
            .filter(
                connection_requests::sender_id
                    .eq(me)
                    .or(connection_requests::receiver_id.eq(me)),
            )
            .select((
                connection_requests::sender_id,
                connection_requests::receiver_id,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(pairs
            .into_iter()
            .map(|(sender, receiver)| {
                let counterpart = if sender == me { receiver } else { sender };
                UserId::from_uuid(counterpart)
            })
            .collect())
    }
}
