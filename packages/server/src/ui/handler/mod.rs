//! Request handlers.

mod http;
mod websocket;

pub use http::{get_connections, health_check, submit_lap};
pub use websocket::websocket_handler;
