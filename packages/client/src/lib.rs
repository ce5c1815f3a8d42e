//! Command-line client for the Lapcast relay.
//!
//! `watch` keeps a WebSocket open and prints every crossing the server
//! broadcasts. `submit` posts a lap event (with optional images) to the
//! ingestion endpoint.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod submit;

pub use error::ClientError;
pub use runner::run_watch;
pub use submit::{SubmitRequest, submit_event};
