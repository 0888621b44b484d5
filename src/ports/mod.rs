//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Session Ports
//!
//! - `SessionRepository` - Read side used by the query handlers
//! - `SessionWriter` - Write side used by the recording handler

mod session_repository;
mod session_writer;

pub use session_repository::SessionRepository;
pub use session_writer::SessionWriter;
