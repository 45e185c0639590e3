//! Event handler and HTTP service for bin day lookups.

pub mod event;
pub mod routes;

pub use event::{BinDayRequest, EventResponse, handle_event};
pub use routes::{AppState, create_router};
