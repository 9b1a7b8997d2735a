//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **storage**: filesystem-backed image blob store
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod storage;
