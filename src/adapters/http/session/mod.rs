//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, ListSessionsParams, MetadataRequest, RecordEventsRequest,
    RecordEventsResponse, SessionListResponse, SessionMetadataResponse, SessionResponse,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
