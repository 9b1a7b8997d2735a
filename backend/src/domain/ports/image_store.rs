//! Port abstraction for stored post images.
//!
//! Adapters receive raw upload bytes and hand back the content-addressed
//! [`ImageRef`] the post row carries; binary data never enters the domain.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::post::ImageRef;
use crate::domain::Error;

/// Errors raised by image store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// Reading or writing the backing storage failed.
    #[error("image store io failed: {message}")]
    Io {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl ImageStoreError {
    /// Build an [`ImageStoreError::Io`] from any message type.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<ImageStoreError> for Error {
    fn from(error: ImageStoreError) -> Self {
        match error {
            ImageStoreError::Io { message } => Error::internal(message),
        }
    }
}

/// Port for image blob storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an uploaded image and return its stored reference.
    ///
    /// Saving identical bytes twice is a no-op returning the same reference.
    async fn save(&self, bytes: &[u8], original_name: &str)
        -> Result<ImageRef, ImageStoreError>;
}

/// In-memory implementation backing tests and the no-database server mode.
#[derive(Debug, Default)]
pub struct FixtureImageStore {
    store: Mutex<HashMap<String, Vec<u8>>>,
}

impl FixtureImageStore {
    /// Whether a reference has been stored.
    #[must_use]
    pub fn contains(&self, image: &ImageRef) -> bool {
        self.lock().contains_key(image.as_ref())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
    ) -> Result<ImageRef, ImageStoreError> {
        let image = ImageRef::for_content(bytes, original_name);
        self.lock()
            .insert(image.as_ref().to_owned(), bytes.to_vec());
        Ok(image)
    }
}
