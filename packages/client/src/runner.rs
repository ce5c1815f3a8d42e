//! Watch execution logic with reconnection support.

use std::time::Duration;

use crate::{
    domain::{failed_attempts_after, should_attempt_reconnect},
    error::ClientError,
    session::{connect_watch_session, run_watch_session},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Watch the relay, reconnecting when the connection is lost
pub async fn run_watch(url: String) -> Result<(), ClientError> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let (connected, result) = match connect_watch_session(&url).await {
            Ok(stream) => (true, run_watch_session(stream).await),
            Err(e) => (false, Err(e)),
        };

        match result {
            Ok(()) => {
                tracing::info!("Watch session ended normally");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count = failed_attempts_after(reconnect_count, connected);

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    if matches!(e, ClientError::ConnectionError(_)) {
                        return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                    }
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
