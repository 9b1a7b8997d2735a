//! Domain ports and supporting types for the hexagonal boundary.

mod connection_repository;
mod image_store;
mod post_repository;
mod user_repository;

pub use connection_repository::{
    ConnectionPersistenceError, ConnectionRepository, FixtureConnectionRepository,
};
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError};
pub use post_repository::{FixturePostRepository, PostPersistenceError, PostRepository};
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
