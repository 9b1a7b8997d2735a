//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod connections;
pub mod error;
pub mod health;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
