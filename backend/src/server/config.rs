//! HTTP server configuration object and helpers.

use backend::outbound::persistence::DbPool;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) token_secret: String,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) uploads_dir: PathBuf,
}

impl ServerConfig {
    /// Construct a server configuration with the signing secret and bind address.
    #[must_use]
    pub fn new(token_secret: impl Into<String>, bind_addr: SocketAddr) -> Self {
        Self {
            token_secret: token_secret.into(),
            bind_addr,
            db_pool: None,
            uploads_dir: PathBuf::from("uploads"),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed repositories and writes
    /// uploaded images under the configured uploads directory. Without it,
    /// every port falls back to its in-memory fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the directory uploaded images are written to.
    #[must_use]
    pub fn with_uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = dir.into();
        self
    }
}
