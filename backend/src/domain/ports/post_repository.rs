//! Port abstraction for post persistence adapters.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::post::Post;
use crate::domain::user::UserId;
use crate::domain::Error;

/// Persistence errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostPersistenceError {
    /// Repository connection could not be established.
    #[error("post repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("post repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl PostPersistenceError {
    /// Build a [`PostPersistenceError::Connection`] from any message type.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`PostPersistenceError::Query`] from any message type.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<PostPersistenceError> for Error {
    fn from(error: PostPersistenceError) -> Self {
        match error {
            PostPersistenceError::Connection { .. } => {
                Error::service_unavailable("service temporarily unavailable")
            }
            PostPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for post storage and author-scoped reads.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// List posts by any of the given authors, newest first.
    async fn list_by_authors(
        &self,
        author_ids: &[UserId],
    ) -> Result<Vec<Post>, PostPersistenceError>;
}

/// In-memory implementation backing tests and the no-database server mode.
#[derive(Debug, Default)]
pub struct FixturePostRepository {
    store: Mutex<Vec<Post>>,
}

impl FixturePostRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Post>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PostRepository for FixturePostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        self.lock().push(post.clone());
        Ok(())
    }

    async fn list_by_authors(
        &self,
        author_ids: &[UserId],
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let mut posts: Vec<Post> = self
            .lock()
            .iter()
            .filter(|post| author_ids.contains(post.author_id()))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(posts)
    }
}
