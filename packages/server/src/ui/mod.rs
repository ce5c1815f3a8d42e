//! HTTP / WebSocket entry points of the relay server.

mod handler;
mod server;
mod signal;
pub mod state;
mod supervisor;

pub use server::Server;
pub use signal::shutdown_signal;
pub use supervisor::ConnectionSupervisor;
