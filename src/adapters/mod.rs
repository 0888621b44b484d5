//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - In-memory and filesystem session stores
//! - `postgres` - PostgreSQL session store
//! - `http` - axum REST API

pub mod http;
pub mod postgres;
pub mod storage;

pub use postgres::PostgresSessionStore;
pub use storage::{FileSessionStore, InMemorySessionStore};
