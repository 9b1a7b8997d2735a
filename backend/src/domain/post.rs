//! Post content model and feed item views.
//!
//! Posts are immutable once created: author, trimmed text content, an
//! optional stored-image reference, and a creation timestamp. Binary image
//! data never enters the domain; the storage adapter hands back an opaque
//! reference that the post carries by name only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::{UserId, UserSummary};

/// Maximum accepted post length in characters.
pub const POST_CONTENT_MAX: usize = 5000;

/// Validation errors raised by post constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// The supplied post id was empty.
    EmptyId,
    /// The supplied post id was not a canonical UUID.
    InvalidId,
    /// Content was empty after trimming.
    EmptyContent,
    /// Content exceeded the maximum length.
    ContentTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The image reference was empty or contained path components.
    InvalidImageRef,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "post id must not be empty"),
            Self::InvalidId => write!(f, "post id must be a valid UUID"),
            Self::EmptyContent => write!(f, "post content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "post content must be at most {max} characters")
            }
            Self::InvalidImageRef => {
                write!(f, "image reference must be a bare file name")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(Uuid, String);

// The `ToSchema` derive cannot apply `value_type`/`format` overrides to a
// multi-field tuple struct, so the declared schema (a UUID-formatted string)
// is implemented by hand.
impl utoipa::PartialSchema for PostId {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::Type::String)
            .format(Some(utoipa::openapi::SchemaFormat::KnownFormat(
                utoipa::openapi::KnownFormat::Uuid,
            )))
            .description(Some("Stable post identifier stored as a UUID."))
            .into()
    }
}

impl ToSchema for PostId {}

impl PostId {
    /// Validate and construct a [`PostId`] from borrowed input.
    ///
    /// # Errors
    /// Returns [`PostValidationError`] when the input is empty or not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`PostId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Construct a [`PostId`] from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, PostValidationError> {
        if id.is_empty() {
            return Err(PostValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PostValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| PostValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for PostId {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> Self {
        let PostId(_, raw) = value;
        raw
    }
}

/// Post text content, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Finished the workshop shelving today.")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct [`PostContent`].
    ///
    /// # Errors
    /// Returns [`PostValidationError`] when the trimmed input is empty or
    /// longer than [`POST_CONTENT_MAX`].
    pub fn new(content: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if trimmed.chars().count() > POST_CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

/// Opaque reference to a stored image, by bare file name.
///
/// The storage adapter mints these; the domain only checks the value stays a
/// single path component so it can be joined under the image directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "9c56cc51b374c3ba189210d5b6d4bf57790d351c96c47c02190ecf1e430635ab.png")]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate and construct an [`ImageRef`].
    ///
    /// # Errors
    /// Returns [`PostValidationError::InvalidImageRef`] when the input is
    /// empty, contains a path separator, or is a dot component.
    pub fn new(name: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let name = name.as_ref();
        let single_component = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && name != "."
            && name != "..";
        if !single_component {
            return Err(PostValidationError::InvalidImageRef);
        }
        Ok(Self(name.to_owned()))
    }

    /// Derive the content-addressed reference for an image payload.
    ///
    /// The name is the SHA-256 digest of the bytes plus a sanitised copy of
    /// the upload's extension, so identical payloads always map to the same
    /// stored file.
    #[must_use]
    pub fn for_content(bytes: &[u8], original_name: &str) -> Self {
        let digest = hex::encode(Sha256::digest(bytes));
        match sanitised_extension(original_name) {
            Some(extension) => Self(format!("{digest}.{extension}")),
            None => Self(digest),
        }
    }
}

fn sanitised_extension(original_name: &str) -> Option<String> {
    let (_, extension) = original_name.rsplit_once('.')?;
    let lowered = extension.to_ascii_lowercase();
    let acceptable = !lowered.is_empty()
        && lowered.len() <= 8
        && lowered.chars().all(|c| c.is_ascii_alphanumeric());
    acceptable.then_some(lowered)
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for ImageRef {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

/// Field bundle used to construct a [`Post`].
#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Post id.
    pub id: PostId,
    /// Authoring identity.
    pub author_id: UserId,
    /// Trimmed text content.
    pub content: PostContent,
    /// Optional stored-image reference.
    pub image: Option<ImageRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An immutable post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    author_id: UserId,
    content: PostContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageRef>,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Construct a [`Post`] from already validated parts.
    #[must_use]
    pub fn new(draft: PostDraft) -> Self {
        let PostDraft {
            id,
            author_id,
            content,
            image,
            created_at,
        } = draft;
        Self {
            id,
            author_id,
            content,
            image,
            created_at,
        }
    }

    /// Post id.
    #[must_use]
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Authoring identity.
    #[must_use]
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Trimmed text content.
    #[must_use]
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// Optional stored-image reference.
    #[must_use]
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A post with its author expanded for display, as listed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Post id.
    pub id: PostId,
    /// Expanded author summary.
    pub author: UserSummary,
    /// Trimmed text content.
    pub content: PostContent,
    /// Optional stored-image reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl FeedItem {
    /// Combine a post with its resolved author summary.
    #[must_use]
    pub fn from_parts(post: &Post, author: UserSummary) -> Self {
        Self {
            id: post.id().clone(),
            author,
            content: post.content().clone(),
            image: post.image().cloned(),
            created_at: post.created_at(),
        }
    }
}
