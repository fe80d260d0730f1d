//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{broadcast_handler, health_check, leave_handler, room_state};
pub use websocket::websocket_handler;
