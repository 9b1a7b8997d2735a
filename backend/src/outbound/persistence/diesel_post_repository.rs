//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{ImageRef, Post, PostContent, PostDraft, PostId, UserId};

use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PostPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostPersistenceError::connection("database connection error")
        }
        _ => PostPersistenceError::query("database error"),
    }
}

fn invalid_row(detail: impl std::fmt::Display) -> PostPersistenceError {
    PostPersistenceError::query(format!("stored post failed validation: {detail}"))
}

fn row_to_post(row: PostRow) -> Result<Post, PostPersistenceError> {
    let content = PostContent::new(&row.content).map_err(invalid_row)?;
    let image = row
        .image
        .as_deref()
        .map(|name| ImageRef::new(name).map_err(invalid_row))
        .transpose()?;

    Ok(Post::new(PostDraft {
        id: PostId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        content,
        image,
        created_at: row.created_at,
    }))
}

fn new_post_row(post: &Post) -> NewPostRow<'_> {
    NewPostRow {
        id: *post.id().as_uuid(),
        author_id: *post.author_id().as_uuid(),
        content: post.content().as_ref(),
        image: post.image().map(AsRef::as_ref),
        created_at: post.created_at(),
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = new_post_row(post);
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_by_authors(
        &self,
        author_ids: &[UserId],
    ) -> Result<Vec<Post>, PostPersistenceError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let uuids: Vec<Uuid> = author_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq_any(uuids))
            .order(posts::created_at.desc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }
}
