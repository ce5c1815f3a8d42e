//! Server configuration.

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ASSET_DIR: &str = "tmp";
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 << 20;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 3_000;

/// Runtime configuration for the relay server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to bind to
    pub port: u16,
    /// Directory where uploaded attachments are stored
    pub asset_dir: PathBuf,
    /// Upper bound for a single connection write during broadcast (`None` = unbounded)
    pub write_timeout: Option<Duration>,
    /// Request body limit for event submissions
    pub max_upload_bytes: usize,
    /// How long to wait for connection tasks to finish on shutdown
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    /// Address string passed to the listener (e.g., "127.0.0.1:8080")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build a write timeout from milliseconds, where `0` disables the bound
    pub fn write_timeout_from_millis(millis: u64) -> Option<Duration> {
        (millis > 0).then(|| Duration::from_millis(millis))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            write_timeout: Self::write_timeout_from_millis(DEFAULT_WRITE_TIMEOUT_MS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            shutdown_grace: Duration::from_millis(DEFAULT_SHUTDOWN_GRACE_MS),
        }
    }
}
