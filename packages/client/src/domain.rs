//! Domain logic for client-side operations.
//!
//! Pure functions with no side effects, kept separate so the reconnect
//! policy can be tested without a server.

use crate::error::ClientError;

/// Check if the client should give up immediately based on the error type.
///
/// Only transport-level failures are worth retrying; everything else
/// would fail the same way again.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    !matches!(error, ClientError::ConnectionError(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Count of consecutive failed attempts after a session ended with an error.
///
/// A session that got connected starts a new streak, so a long-running
/// watcher only gives up after back-to-back failures.
pub fn failed_attempts_after(previous: u32, connected: bool) -> u32 {
    if connected { 1 } else { previous + 1 }
}
