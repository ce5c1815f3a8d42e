//! Supervision of per-connection tasks.
//!
//! Every accepted WebSocket runs its read loop inside a tracked task that
//! also observes a child of the supervisor's cancellation token. Shutdown
//! cancels the token and awaits the tracked tasks.

use std::{future::Future, time::Duration};

use tokio_util::{
    sync::CancellationToken,
    task::{TaskTracker, task_tracker::TrackedFuture},
};

#[derive(Clone, Default)]
pub struct ConnectionSupervisor {
    tracker: TaskTracker,
    token: CancellationToken,
}

impl ConnectionSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a new connection, cancelled when the supervisor shuts down
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Wrap a connection task so shutdown can await it
    pub fn track<F: Future>(&self, future: F) -> TrackedFuture<F> {
        self.tracker.track_future(future)
    }

    /// Ask every connection task to stop, without waiting
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel all connection tasks and wait up to `grace` for them to finish
    ///
    /// Returns `true` if every task finished in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.token.cancel();
        self.tracker.close();

        let remaining = self.tracker.len();
        if remaining > 0 {
            tracing::info!("Waiting for {} connection task(s) to finish", remaining);
        }
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    "{} connection task(s) still running after {:?}",
                    self.tracker.len(),
                    grace
                );
                false
            }
        }
    }
}
