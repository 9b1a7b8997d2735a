//! Regression coverage for the post service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::connection::{ConnectionDraft, ConnectionRequest, ConnectionRequestId, ConnectionStatus};
use crate::domain::ports::{
    ConnectionRepository, FixtureConnectionRepository, FixtureImageStore, FixturePostRepository,
    FixtureUserRepository, PostRepository, UserRepository,
};
use crate::domain::post::{Post, PostContent, PostDraft, PostId};
use crate::domain::user::{Email, PersonName, Role, User, UserDraft, UserId, UserProfile};

use super::{ImageUpload, PostService};

struct Harness {
    users: Arc<FixtureUserRepository>,
    connections: Arc<FixtureConnectionRepository>,
    posts: Arc<FixturePostRepository>,
    images: Arc<FixtureImageStore>,
    service: PostService,
}

impl Harness {
    fn new() -> Self {
        let users = Arc::new(FixtureUserRepository::default());
        let connections = Arc::new(FixtureConnectionRepository::default());
        let posts = Arc::new(FixturePostRepository::default());
        let images = Arc::new(FixtureImageStore::default());
        let service = PostService::new(
            posts.clone(),
            connections.clone(),
            users.clone(),
            images.clone(),
        );
        Self {
            users,
            connections,
            posts,
            images,
            service,
        }
    }

    async fn seed_user(&self, name: &str, email: &str) -> User {
        let now = Utc::now();
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: PersonName::new(name).expect("valid name"),
            email: Email::new(email).expect("valid email"),
            role: Role::User,
            professional_type: None,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        })
        .expect("valid user");
        self.users
            .insert(&user, "stored-hash")
            .await
            .expect("seed user");
        user
    }

    async fn seed_connection(&self, sender: &User, receiver: &User, status: ConnectionStatus) {
        let now = Utc::now();
        let request = ConnectionRequest::new(ConnectionDraft {
            id: ConnectionRequestId::random(),
            sender_id: sender.id().clone(),
            receiver_id: receiver.id().clone(),
            status,
            created_at: now,
            updated_at: now,
        })
        .expect("valid request");
        self.connections
            .insert(&request)
            .await
            .expect("seed request");
    }

    async fn seed_post(&self, author: &User, content: &str, created_at: DateTime<Utc>) -> Post {
        let post = Post::new(PostDraft {
            id: PostId::random(),
            author_id: author.id().clone(),
            content: PostContent::new(content).expect("valid content"),
            image: None,
            created_at,
        });
        self.posts.insert(&post).await.expect("seed post");
        post
    }
}

#[tokio::test]
async fn create_post_without_an_image() {
    let harness = Harness::new();
    let alice = harness.seed_user("Alice Smith", "alice@example.com").await;

    let post = harness
        .service
        .create_post(
            alice.id(),
            PostContent::new("First post.").expect("valid content"),
            None,
        )
        .await
        .expect("create succeeds");

    assert_eq!(post.author_id(), alice.id());
    assert_eq!(post.image(), None);
}

#[tokio::test]
async fn create_post_stores_the_attached_image() {
    let harness = Harness::new();
    let alice = harness.seed_user("Alice Smith", "alice@example.com").await;

    let post = harness
        .service
        .create_post(
            alice.id(),
            PostContent::new("With a photo.").expect("valid content"),
            Some(ImageUpload {
                bytes: b"png bytes".to_vec(),
                original_name: "holiday.png".to_owned(),
            }),
        )
        .await
        .expect("create succeeds");

    let image = post.image().expect("image reference recorded");
    assert!(image.as_ref().ends_with(".png"));
    assert!(harness.images.contains(image));
}

#[tokio::test]
async fn allowed_authors_cover_self_and_accepted_counterparts() {
    let harness = Harness::new();
    let alice = harness.seed_user("Alice Smith", "alice@example.com").await;
    let bob = harness.seed_user("Bob Jones", "bob@example.com").await;
    let carol = harness.seed_user("Carol Yu", "carol@example.com").await;
    harness
        .seed_connection(&alice, &bob, ConnectionStatus::Accepted)
        .await;
    harness
        .seed_connection(&carol, &alice, ConnectionStatus::Pending)
        .await;

    let authors = harness
        .service
        .allowed_authors(alice.id())
        .await
        .expect("authors resolve");

    assert_eq!(authors.len(), 2);
    assert!(authors.contains(alice.id()));
    assert!(authors.contains(bob.id()));
    assert!(!authors.contains(carol.id()));
}

#[tokio::test]
async fn feed_merges_visible_posts_newest_first() {
    let harness = Harness::new();
    let alice = harness.seed_user("Alice Smith", "alice@example.com").await;
    let bob = harness.seed_user("Bob Jones", "bob@example.com").await;
    harness
        .seed_connection(&alice, &bob, ConnectionStatus::Accepted)
        .await;

    let now = Utc::now();
    harness
        .seed_post(&alice, "Older post.", now - Duration::hours(1))
        .await;
    harness.seed_post(&bob, "Newer post.", now).await;

    let feed = harness
        .service
        .list_feed(alice.id())
        .await
        .expect("feed resolves");

    assert_eq!(feed.len(), 2);
    assert_eq!(&feed[0].author.id, bob.id());
    assert_eq!(feed[0].content.as_ref(), "Newer post.");
    assert_eq!(&feed[1].author.id, alice.id());
}

#[tokio::test]
async fn feed_hides_posts_from_pending_counterparts() {
    let harness = Harness::new();
    let alice = harness.seed_user("Alice Smith", "alice@example.com").await;
    let carol = harness.seed_user("Carol Yu", "carol@example.com").await;
    harness
        .seed_connection(&alice, &carol, ConnectionStatus::Pending)
        .await;
    harness.seed_post(&carol, "Not yet visible.", Utc::now()).await;

    let feed = harness
        .service
        .list_feed(alice.id())
        .await
        .expect("feed resolves");

    assert!(feed.is_empty());
}
