//! Session command and query handlers.

mod get_session;
mod list_sessions;
mod record_session;

pub use get_session::{GetSessionHandler, GetSessionQuery, SessionRecord};
pub use list_sessions::{ListSessionsHandler, ListSessionsQuery, SessionPage, DEFAULT_PAGE_LIMIT};
pub use record_session::{
    MetadataInput, RecordSessionCommand, RecordSessionHandler, RecordSessionResult,
};
