//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The adapters here are thin: they translate between Diesel row structs and
//! domain types and map database failures onto the domain persistence error
//! enums. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! internal to this module.

mod diesel_connection_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_connection_repository::DieselConnectionRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
