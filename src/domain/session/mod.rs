//! Session domain module.
//!
//! A session is a recorded sequence of user-interaction events plus optional
//! summary metadata, keyed by a caller-supplied [`SessionId`].
//!
//! [`SessionId`]: crate::domain::foundation::SessionId

mod errors;
mod events;
mod metadata;

pub use errors::SessionError;
pub use events::SessionEvent;
pub use metadata::{select_page, SessionMetadata, RESERVED_KEYS};
