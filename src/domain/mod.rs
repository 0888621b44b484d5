//! Domain layer containing the session replay vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors)
//! - `session` - Recorded events, session metadata, and session errors

pub mod foundation;
pub mod session;
