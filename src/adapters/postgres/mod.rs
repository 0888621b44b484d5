//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresSessionStore` - Event logs and metadata for recorded sessions

mod session_store;

pub use session_store::PostgresSessionStore;
