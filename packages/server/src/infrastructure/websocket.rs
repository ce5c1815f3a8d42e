//! WebSocket を使った Connection 実装
//!
//! ## 責務
//!
//! - WebSocket の送信側（sink）を保持し、テキストフレームを書き込む
//! - 冪等なクローズ
//!
//! ## 設計ノート
//!
//! WebSocket の受け付けと読み取りループは UI 層（`src/ui/handler/websocket.rs`）が担当します。
//! この実装は分割された送信側だけを受け取ります。クローズ時にはキャンセルトークンを
//! キャンセルし、読み取りループに切断を知らせます。

use std::{
    net::SocketAddr,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{Connection, ConnectionId, TransportError};

/// クローズフレーム送信の上限時間
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket の送信側を包んだ Connection
pub struct WebSocketConnection<S> {
    id: ConnectionId,
    remote_addr: Option<SocketAddr>,
    sink: Mutex<S>,
    closed: AtomicBool,
    /// クローズ時、またはサーバー停止時にキャンセルされる
    cancel: CancellationToken,
}

impl<S> WebSocketConnection<S> {
    /// 新しい WebSocketConnection を作成
    ///
    /// # 引数
    ///
    /// - `cancel`: サーバー全体のトークンの子トークンを渡すと、停止時に読み取りループも終了する
    pub fn new(
        id: ConnectionId,
        remote_addr: Option<SocketAddr>,
        sink: S,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            remote_addr,
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
            cancel,
        }
    }

    /// このコネクションが終了すべきときにキャンセルされるトークン
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl<S> Connection for WebSocketConnection<S>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: std::fmt::Display + Send,
{
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text.to_owned().into()))
            .await
            .map_err(|e| TransportError::WriteFailed(e.to_string()))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.cancel.cancel();

        let result = tokio::time::timeout(CLOSE_TIMEOUT, async {
            let mut sink = self.sink.lock().await;
            sink.close().await
        })
        .await;
        match result {
            Ok(Ok(())) => tracing::debug!("Connection {} closed", self.id),
            Ok(Err(e)) => tracing::debug!("Connection {} closed with error: {}", self.id, e),
            Err(_) => tracing::debug!("Connection {} close timed out", self.id),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio_util::sync::PollSender;

    fn create_test_connection() -> (
        WebSocketConnection<PollSender<Message>>,
        mpsc::Receiver<Message>,
    ) {
        let (tx, rx) = mpsc::channel(8);
        let conn = WebSocketConnection::new(
            ConnectionId::generate(),
            Some("127.0.0.1:50000".parse().unwrap()),
            PollSender::new(tx),
            CancellationToken::new(),
        );
        (conn, rx)
    }

    #[tokio::test]
    async fn test_send_text_writes_text_frame() {
        // テスト項目: send_text がテキストフレームを1つ書き込む
        // given (前提条件):
        let (conn, mut rx) = create_test_connection();

        // when (操作):
        let result = conn.send_text("Car 1 crossed at now").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(Message::Text("Car 1 crossed at now".into()))
        );
    }

    #[tokio::test]
    async fn test_send_text_fails_when_peer_is_gone() {
        // テスト項目: 受信側が無くなった場合、送信は WriteFailed になる
        // given (前提条件):
        let (conn, rx) = create_test_connection();
        drop(rx);

        // when (操作):
        let result = conn.send_text("hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(TransportError::WriteFailed(_))));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        // テスト項目: close を複数回呼んでも安全で、トークンがキャンセルされる
        // given (前提条件):
        let (conn, mut rx) = create_test_connection();
        let token = conn.cancellation();

        // when (操作):
        conn.close().await;
        conn.close().await;

        // then (期待する結果):
        assert!(conn.is_closed());
        assert!(token.is_cancelled());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_text_after_close_is_rejected() {
        // テスト項目: クローズ後の送信は Closed エラーになる
        // given (前提条件):
        let (conn, _rx) = create_test_connection();
        conn.close().await;

        // when (操作):
        let result = conn.send_text("late").await;

        // then (期待する結果):
        assert_eq!(result, Err(TransportError::Closed));
    }
}
