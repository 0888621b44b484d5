//! Session Replay - retrieval service for recorded user sessions
//!
//! Serves the event logs and summary metadata captured by the front-end
//! session recorder, backed by memory, the filesystem, or PostgreSQL.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
