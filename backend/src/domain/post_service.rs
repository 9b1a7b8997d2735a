//! Post and feed service.
//!
//! Accepts new posts, hands attached images to the store before anything is
//! persisted, and assembles the visibility-scoped feed. Feed visibility is
//! the one rule with real reach here: a viewer sees their own posts plus
//! those of accepted counterparts, and nobody else's.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::ports::{ConnectionRepository, ImageStore, PostRepository, UserRepository};
use crate::domain::post::{FeedItem, Post, PostContent, PostDraft, PostId};
use crate::domain::user::{UserId, UserSummary};

/// Raw image upload accompanying a post.
///
/// Bytes arrive exactly as received from the transport; the store derives the
/// persisted name itself, so `original_name` only contributes its extension.
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

/// Application service for authoring posts and reading the feed.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    connections: Arc<dyn ConnectionRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    /// Creates a service over the post, connection and user repositories plus
    /// the image store.
    #[must_use]
    pub fn new(
        posts: Arc<dyn PostRepository>,
        connections: Arc<dyn ConnectionRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            connections,
            users,
            images,
        }
    }

    /// Stores a post authored by `author`, saving any attached image first.
    ///
    /// The image write happens before the post row exists, so a post never
    /// references an image that failed to land on disk.
    ///
    /// # Errors
    ///
    /// Propagates image store and repository failures.
    pub async fn create_post(
        &self,
        author: &UserId,
        content: PostContent,
        upload: Option<ImageUpload>,
    ) -> Result<Post, Error> {
        let image = match upload {
            Some(upload) => Some(
                self.images
                    .save(&upload.bytes, &upload.original_name)
                    .await?,
            ),
            None => None,
        };
        let post = Post::new(PostDraft {
            id: PostId::random(),
            author_id: author.clone(),
            content,
            image,
            created_at: Utc::now(),
        });
        self.posts.insert(&post).await?;
        Ok(post)
    }

    /// Authors whose posts `viewer` may see: the viewer themselves plus every
    /// accepted counterpart. Pending and rejected requests grant nothing.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn allowed_authors(&self, viewer: &UserId) -> Result<Vec<UserId>, Error> {
        let mut authors = self.connections.accepted_counterpart_ids(viewer).await?;
        authors.push(viewer.clone());
        Ok(authors)
    }

    /// Assembles the feed for `viewer`, newest post first, authors expanded.
    ///
    /// # Errors
    ///
    /// Propagates repository failures only.
    pub async fn list_feed(&self, viewer: &UserId) -> Result<Vec<FeedItem>, Error> {
        let authors = self.allowed_authors(viewer).await?;
        let posts = self.posts.list_by_authors(&authors).await?;

        let author_ids: Vec<UserId> = posts.iter().map(|post| post.author_id().clone()).collect();
        let summaries: HashMap<UserId, UserSummary> = self
            .users
            .find_summaries(&author_ids)
            .await?
            .into_iter()
            .map(|summary| (summary.id.clone(), summary))
            .collect();

        posts
            .iter()
            .map(|post| {
                summaries
                    .get(post.author_id())
                    .cloned()
                    .map(|author| FeedItem::from_parts(post, author))
                    .ok_or_else(|| Error::internal("post references a missing author"))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
