//! Builders for the HTTP state and its port implementations.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    ConnectionRepository, FixtureConnectionRepository, FixtureImageStore, FixturePostRepository,
    FixtureUserRepository, ImageStore, PostRepository, UserRepository,
};
use backend::domain::{AccountService, ConnectionService, PostService};
use backend::inbound::http::session::AuthTokens;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselConnectionRepository, DieselPostRepository, DieselUserRepository,
};
use backend::outbound::storage::FsImageStore;

use super::ServerConfig;

struct Ports {
    users: Arc<dyn UserRepository>,
    connections: Arc<dyn ConnectionRepository>,
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
}

/// Select database-backed ports when a pool is configured, otherwise the
/// in-memory fixtures. The image store follows the same split so a fixture
/// run leaves no files behind.
fn build_ports(config: &ServerConfig) -> std::io::Result<Ports> {
    match &config.db_pool {
        Some(pool) => {
            let images = FsImageStore::open(&config.uploads_dir).map_err(|error| {
                std::io::Error::other(format!(
                    "failed to open uploads directory {}: {error}",
                    config.uploads_dir.display()
                ))
            })?;
            Ok(Ports {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                connections: Arc::new(DieselConnectionRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool.clone())),
                images: Arc::new(images),
            })
        }
        None => Ok(Ports {
            users: Arc::new(FixtureUserRepository::default()),
            connections: Arc::new(FixtureConnectionRepository::default()),
            posts: Arc::new(FixturePostRepository::default()),
            images: Arc::new(FixtureImageStore::default()),
        }),
    }
}

/// Assemble the handler dependency bundle from the configured ports.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = build_ports(config)?;
    let accounts = AccountService::new(ports.users.clone());
    let connections = ConnectionService::new(ports.connections.clone(), ports.users.clone());
    let posts = PostService::new(ports.posts, ports.connections, ports.users, ports.images);
    let tokens = AuthTokens::new(&config.token_secret);

    Ok(web::Data::new(HttpState::new(
        accounts,
        connections,
        posts,
        tokens,
    )))
}
