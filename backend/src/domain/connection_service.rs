//! Connection graph service.
//!
//! Drives the request/accept state machine between two identities and the
//! read models layered on top of it: the caller's connection list, the
//! per-counterpart status map, and keyword search over other accounts. Party
//! expansion happens here so transports always receive views carrying both
//! sender and receiver summaries rather than bare identifiers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::connection::{
    ConnectionDraft, ConnectionRequest, ConnectionRequestId, ConnectionStatus, ConnectionView,
    derive_status_map,
};
use crate::domain::error::Error;
use crate::domain::ports::{ConnectionRepository, UserRepository};
use crate::domain::user::{UserId, UserSummary};

/// Application service for the connection request lifecycle.
#[derive(Clone)]
pub struct ConnectionService {
    connections: Arc<dyn ConnectionRepository>,
    users: Arc<dyn UserRepository>,
}

impl ConnectionService {
    /// Creates a service over the connection and user repositories.
    #[must_use]
    pub fn new(connections: Arc<dyn ConnectionRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { connections, users }
    }

    /// Sends a pending request from `sender` to `receiver`.
    ///
    /// At most one request may exist per identity pair, whichever direction it
    /// was sent in. The pair check runs before the insert for a friendly
    /// message, and the repository's pair-unique constraint backs it up under
    /// concurrency.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when `sender` and `receiver` are the same identity.
    /// - `not_found` when either party has no account.
    /// - `conflict` when a request already links the pair.
    pub async fn send_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
    ) -> Result<ConnectionView, Error> {
        if sender == receiver {
            return Err(Error::invalid_request("Cannot connect with yourself"));
        }
        let receiver_user = self
            .users
            .find_by_id(receiver)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let sender_user = self
            .users
            .find_by_id(sender)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        if self
            .connections
            .find_between(sender, receiver)
            .await?
            .is_some()
        {
            return Err(Error::conflict("Request already exists"));
        }

        let now = Utc::now();
        let request = ConnectionRequest::new(ConnectionDraft {
            id: ConnectionRequestId::random(),
            sender_id: sender.clone(),
            receiver_id: receiver.clone(),
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.connections.insert(&request).await?;

        Ok(ConnectionView::from_parts(
            &request,
            sender_user.summary(),
            receiver_user.summary(),
        ))
    }

    /// Accepts a pending request on behalf of `actor`.
    ///
    /// Only the addressed receiver may accept. Accepting a request that is
    /// already accepted changes nothing and returns the current view.
    ///
    /// # Errors
    ///
    /// - `not_found` when no request has the given id.
    /// - `forbidden` when `actor` is not the receiver.
    pub async fn accept_request(
        &self,
        request_id: &ConnectionRequestId,
        actor: &UserId,
    ) -> Result<ConnectionView, Error> {
        let request = self
            .connections
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| Error::not_found("Request not found"))?;
        if request.receiver_id() != actor {
            return Err(Error::forbidden("Not authorized"));
        }
        let request = if request.is_accepted() {
            request
        } else {
            self.connections
                .mark_accepted(request_id, Utc::now())
                .await?
                .ok_or_else(|| Error::not_found("Request not found"))?
        };
        self.expand(&request).await
    }

    /// Lists every request involving `viewer`, newest first, with both
    /// parties expanded.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn list_for(&self, viewer: &UserId) -> Result<Vec<ConnectionView>, Error> {
        let mut requests = self.connections.list_for_user(viewer).await?;
        requests.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let mut party_ids = Vec::with_capacity(requests.len() * 2);
        for request in &requests {
            party_ids.push(request.sender_id().clone());
            party_ids.push(request.receiver_id().clone());
        }
        let summaries = self.summaries_by_id(&party_ids).await?;

        requests
            .iter()
            .map(|request| assemble_view(request, &summaries))
            .collect()
    }

    /// Maps each counterpart of `viewer` to the status of the request linking
    /// them, whichever party sent it.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn status_map(
        &self,
        viewer: &UserId,
    ) -> Result<HashMap<UserId, ConnectionStatus>, Error> {
        let requests = self.connections.list_for_user(viewer).await?;
        Ok(derive_status_map(viewer, &requests))
    }

    /// Searches other accounts by a case-insensitive keyword.
    ///
    /// The keyword matches against name, role and trade. A blank keyword
    /// yields no matches, and `viewer` never appears in their own results.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn search_users(
        &self,
        viewer: &UserId,
        keyword: &str,
    ) -> Result<Vec<UserSummary>, Error> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.users.search(keyword, viewer).await?)
    }

    async fn expand(&self, request: &ConnectionRequest) -> Result<ConnectionView, Error> {
        let party_ids = [request.sender_id().clone(), request.receiver_id().clone()];
        let summaries = self.summaries_by_id(&party_ids).await?;
        assemble_view(request, &summaries)
    }

    async fn summaries_by_id(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserSummary>, Error> {
        let summaries = self.users.find_summaries(ids).await?;
        Ok(summaries
            .into_iter()
            .map(|summary| (summary.id.clone(), summary))
            .collect())
    }
}

fn assemble_view(
    request: &ConnectionRequest,
    summaries: &HashMap<UserId, UserSummary>,
) -> Result<ConnectionView, Error> {
    let sender = summaries
        .get(request.sender_id())
        .cloned()
        .ok_or_else(missing_party)?;
    let receiver = summaries
        .get(request.receiver_id())
        .cloned()
        .ok_or_else(missing_party)?;
    Ok(ConnectionView::from_parts(request, sender, receiver))
}

fn missing_party() -> Error {
    Error::internal("connection request references a missing account")
}

#[cfg(test)]
#[path = "connection_service_tests.rs"]
mod tests;
