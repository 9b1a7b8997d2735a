//! Post and feed endpoints.
//!
//! Posts arrive as `multipart/form-data` so an image can travel with the
//! text. The feed applies connection-based visibility: callers see their own
//! posts plus those of accepted counterparts, and nothing else.

use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, get, post, web};
use utoipa::ToSchema;

use crate::domain::{Error, FeedItem, ImageUpload, Post, PostContent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::AuthedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

const CONTENT_FIELD: FieldName = FieldName::new("content");

/// Name used when the client sends an attachment without one.
const FALLBACK_UPLOAD_NAME: &str = "upload";

/// Multipart fields accepted by [`create_post`].
#[derive(Debug, MultipartForm)]
pub struct CreatePostForm {
    /// Post body text.
    pub content: Text<String>,
    /// Optional image attachment.
    pub image: Option<TempFile>,
}

/// Documented shape of the [`create_post`] multipart payload.
#[derive(Debug, ToSchema)]
pub struct CreatePostRequest {
    /// Post body text.
    pub content: String,
    /// Optional image attachment.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

fn read_upload(upload: TempFile) -> Result<ImageUpload, Error> {
    let TempFile {
        mut file,
        file_name,
        size,
        ..
    } = upload;
    let original_name = file_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_owned());
    let mut bytes = Vec::with_capacity(size);
    // The multipart writer leaves the cursor at the end of the spooled file.
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
        .map_err(|error| Error::internal(format!("failed to read uploaded image: {error}")))?;
    Ok(ImageUpload {
        bytes,
        original_name,
    })
}

/// Create a post, optionally attaching one image.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body(content = CreatePostRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost",
    security(("BearerToken" = []))
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    caller: AuthedUser,
    MultipartForm(form): MultipartForm<CreatePostForm>,
) -> ApiResult<HttpResponse> {
    let content = PostContent::new(form.content.into_inner())
        .map_err(|error| invalid_value_error(CONTENT_FIELD, error.to_string()))?;
    let upload = form.image.map(read_upload).transpose()?;
    let created = state
        .posts
        .create_post(&caller.user_id, content, upload)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Feed of posts visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/feed",
    responses(
        (status = 200, description = "Visible posts, newest first", body = [FeedItem]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getFeed",
    security(("BearerToken" = []))
)]
#[get("/posts/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    caller: AuthedUser,
) -> ApiResult<web::Json<Vec<FeedItem>>> {
    let items = state.posts.list_feed(&caller.user_id).await?;
    Ok(web::Json(items))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
