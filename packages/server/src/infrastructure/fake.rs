//! テスト用の Connection 実装

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::domain::{Connection, ConnectionId, TransportError};

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Healthy,
    Failing,
    Stalled,
}

/// 送信内容を記録する Connection
///
/// - `healthy`: 送信は常に成功（クローズ後は失敗）
/// - `failing`: 送信は常に失敗
/// - `stalled`: 送信が完了しない（書き込みタイムアウトの検証用）
/// - `failing_slow_close`: 送信は常に失敗し、クローズに時間がかかる
pub(crate) struct FakeConnection {
    id: ConnectionId,
    behavior: Behavior,
    close_delay: Option<Duration>,
    received: Mutex<Vec<String>>,
    closed: AtomicBool,
    close_calls: AtomicUsize,
}

impl FakeConnection {
    fn with_behavior(behavior: Behavior, close_delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::generate(),
            behavior,
            close_delay,
            received: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn healthy() -> Arc<Self> {
        Self::with_behavior(Behavior::Healthy, None)
    }

    pub(crate) fn failing() -> Arc<Self> {
        Self::with_behavior(Behavior::Failing, None)
    }

    pub(crate) fn stalled() -> Arc<Self> {
        Self::with_behavior(Behavior::Stalled, None)
    }

    pub(crate) fn failing_slow_close(delay: Duration) -> Arc<Self> {
        Self::with_behavior(Behavior::Failing, Some(delay))
    }

    pub(crate) fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        None
    }

    async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        match self.behavior {
            Behavior::Healthy if self.is_closed() => Err(TransportError::Closed),
            Behavior::Healthy => {
                self.received.lock().unwrap().push(text.to_string());
                Ok(())
            }
            Behavior::Failing => Err(TransportError::WriteFailed("broken pipe".to_string())),
            Behavior::Stalled => std::future::pending().await,
        }
    }

    async fn close(&self) {
        if let Some(delay) = self.close_delay {
            tokio::time::sleep(delay).await;
        }
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
