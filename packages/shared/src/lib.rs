//! Code shared between the Lapcast server and client.

pub mod logger;
pub mod protocol;
pub mod time;
