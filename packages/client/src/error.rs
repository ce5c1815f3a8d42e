//! Error types for the Lapcast client.

use std::path::PathBuf;

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Reconnection attempts exhausted
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),

    /// The server answered an event submission with a non-success status
    #[error("Server rejected the event ({status}): {body}")]
    SubmitRejected { status: u16, body: String },

    /// The server base URL cannot carry a path
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An image to attach could not be read
    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
