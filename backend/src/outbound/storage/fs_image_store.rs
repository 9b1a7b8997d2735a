//! Filesystem-backed `ImageStore` using a capability-scoped directory.
//!
//! Files are named by content digest, so repeated uploads of the same bytes
//! land on the same path and saves stay idempotent. Writes go through a
//! staging name and a rename, never a partial final file.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::ImageRef;

/// Image store rooted at a single uploads directory.
///
/// The directory handle is capability-scoped; the store cannot touch paths
/// outside it regardless of what a stored name contains.
#[derive(Clone)]
pub struct FsImageStore {
    root: Arc<Dir>,
}

impl FsImageStore {
    /// Open the store, creating the uploads directory when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(map_io_error)?;
        let root = Dir::open_ambient_dir(path, ambient_authority()).map_err(map_io_error)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

fn map_io_error(error: std::io::Error) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
    ) -> Result<ImageRef, ImageStoreError> {
        let image = ImageRef::for_content(bytes, original_name);
        if self.root.is_file(image.as_ref()) {
            return Ok(image);
        }

        let staging = format!(".tmp-upload-{}", Uuid::new_v4().simple());
        self.root.write(&staging, bytes).map_err(map_io_error)?;
        let renamed = self.root.rename(&staging, &self.root, image.as_ref());
        if renamed.is_err() {
            let _cleanup_result = self.root.remove_file(&staging);
        }
        renamed.map_err(map_io_error)?;

        Ok(image)
    }
}
