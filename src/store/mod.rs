//! # Relational Store
//!
//! Embedded SQLite store reached through `rusqlite`. The engine provides
//! durability, isolation and constraint enforcement; this module provides a
//! shared connection, an all-or-nothing transaction runner, the schema, and
//! classification of engine failures.

pub mod database;
pub mod errors;
pub mod schema;

pub use database::{Database, DatabaseLocation, DEFAULT_BUSY_TIMEOUT};
pub use errors::{ConstraintKind, StoreError, StoreResult};
