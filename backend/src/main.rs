//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rand::RngCore;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let token_secret = load_token_secret()?;
    let bind_addr = load_bind_addr()?;
    let mut config = ServerConfig::new(token_secret, bind_addr);
    if let Ok(dir) = env::var("UPLOADS_DIR") {
        config = config.with_uploads_dir(dir);
    }
    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_migrations(&database_url)?;
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("failed to build database pool: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; serving from in-memory fixtures");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

/// Read the bearer-token signing secret, or generate a throwaway one in
/// development builds.
fn load_token_secret() -> std::io::Result<String> {
    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_secret".into());
    match std::fs::read_to_string(&secret_path) {
        Ok(secret) if !secret.trim().is_empty() => Ok(secret.trim().to_owned()),
        Ok(_) => Err(std::io::Error::other(format!(
            "token secret at {secret_path} is empty"
        ))),
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using temporary token secret (dev only)");
                Ok(ephemeral_secret())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )))
            }
        }
    }
}

fn ephemeral_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn load_bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw:?}: {e}")))
}

/// Apply pending schema migrations before the pool starts handing out
/// connections.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut connection = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("failed to connect for migrations: {e}")))?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    Ok(())
}
