//! Tests for post HTTP handlers.

use super::*;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::Role;
use crate::inbound::http::test_utils::{bearer_for, fixture_state, signup_user};

const BOUNDARY: &str = "b93e7c12a4f05d68";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01];

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").service(create_post).service(feed))
}

fn multipart_body(content: Option<&str>, image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    if let Some(content) = content {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"content\"\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

fn post_request(bearer: &str, content: &str, image: Option<(&str, &[u8])>) -> actix_test::TestRequest {
    let (content_type, body) = multipart_body(Some(content), image);
    actix_test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header((header::AUTHORIZATION, bearer.to_owned()))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}

async fn call_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

async fn feed_contents(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    bearer: &str,
) -> Vec<String> {
    let (status, body) = call_json(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/posts/feed")
            .insert_header((header::AUTHORIZATION, bearer.to_owned())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| item["content"].as_str().expect("content").to_owned())
        .collect()
}

#[actix_web::test]
async fn creating_a_text_post_returns_the_stored_shape() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bearer = bearer_for(&state, &alice);
    let app = actix_test::init_service(test_app(state)).await;

    let (status, body) =
        call_json(&app, post_request(&bearer, "  Fitted the staircase today  ", None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "Fitted the staircase today");
    assert_eq!(body["authorId"], alice.id().to_string());
    assert!(body.get("image").is_none());
    assert!(body.get("createdAt").is_some());
    Uuid::parse_str(body["id"].as_str().expect("post id")).expect("post id is a UUID");
}

#[actix_web::test]
async fn an_attached_image_is_stored_by_content() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bearer = bearer_for(&state, &alice);
    let app = actix_test::init_service(test_app(state)).await;

    let (status, body) = call_json(
        &app,
        post_request(&bearer, "Site photo", Some(("site-photo.PNG", PNG_BYTES))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let image = body["image"].as_str().expect("image reference");
    let (stem, extension) = image.rsplit_once('.').expect("digest and extension");
    assert_eq!(extension, "png");
    assert_eq!(stem.len(), 64);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
}

#[actix_web::test]
async fn blank_content_is_rejected() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bearer = bearer_for(&state, &alice);
    let app = actix_test::init_service(test_app(state)).await;

    let (status, body) = call_json(&app, post_request(&bearer, "   ", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "post content must not be empty");
    assert_eq!(body["details"]["field"], "content");
    assert_eq!(body["details"]["code"], "invalid_value");
}

#[actix_web::test]
async fn a_missing_content_field_is_rejected() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bearer = bearer_for(&state, &alice);
    let app = actix_test::init_service(test_app(state)).await;

    let (content_type, body) = multipart_body(None, Some(("photo.png", PNG_BYTES)));
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header((header::AUTHORIZATION, bearer))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn the_feed_is_scoped_to_accepted_connections() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bob = signup_user(&state, "Bob Joiner", "bob@example.com", Role::User, None).await;
    let cara = signup_user(&state, "Cara Smith", "cara@example.com", Role::User, None).await;

    // Alice and Bob are connected; Cara's request to Alice is still pending.
    let link = state
        .connections
        .send_request(alice.id(), bob.id())
        .await
        .expect("request sent");
    state
        .connections
        .accept_request(&link.id, bob.id())
        .await
        .expect("request accepted");
    state
        .connections
        .send_request(cara.id(), alice.id())
        .await
        .expect("pending request sent");

    let alice_bearer = bearer_for(&state, &alice);
    let bob_bearer = bearer_for(&state, &bob);
    let cara_bearer = bearer_for(&state, &cara);
    let app = actix_test::init_service(test_app(state)).await;

    for (bearer, content) in [
        (&bob_bearer, "Workbench finished"),
        (&cara_bearer, "Waiting on an answer"),
        (&alice_bearer, "Hello wall"),
    ] {
        let (status, _) = call_json(&app, post_request(bearer, content, None)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    assert_eq!(
        feed_contents(&app, &alice_bearer).await,
        vec!["Hello wall", "Workbench finished"]
    );
    assert_eq!(
        feed_contents(&app, &bob_bearer).await,
        vec!["Hello wall", "Workbench finished"]
    );
    assert_eq!(
        feed_contents(&app, &cara_bearer).await,
        vec!["Waiting on an answer"]
    );
}

#[actix_web::test]
async fn feed_entries_expand_the_author() {
    let state = fixture_state();
    let alice = signup_user(&state, "Alice Mason", "alice@example.com", Role::User, None).await;
    let bearer = bearer_for(&state, &alice);
    let app = actix_test::init_service(test_app(state)).await;

    let (_, _) = call_json(&app, post_request(&bearer, "Hello wall", None)).await;
    let (status, body) = call_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/posts/feed")
            .insert_header((header::AUTHORIZATION, bearer)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["author"]["name"], "Alice Mason");
    assert_eq!(body[0]["author"]["id"], alice.id().to_string());
    assert_eq!(body[0]["author"]["role"], "user");
}

#[actix_web::test]
async fn creating_a_post_requires_a_token() {
    let app = actix_test::init_service(test_app(fixture_state())).await;

    let (content_type, body) = multipart_body(Some("Hello wall"), None);
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body);
    let (status, body) = call_json(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[actix_web::test]
async fn the_feed_requires_a_token() {
    let app = actix_test::init_service(test_app(fixture_state())).await;

    let (status, body) = call_json(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/posts/feed"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}
