//! WebSocket connection handlers.
//!
//! Each accepted socket is split: the sink half becomes a registered
//! [`WebSocketConnection`] used by broadcasts, the stream half is drained by
//! the read loop, whose only job is to notice when the client is gone.

use std::{fmt, net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{Connection, ConnectionId},
    infrastructure::WebSocketConnection,
    ui::state::AppState,
};

/// Why a connection's read loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CloseReason {
    /// The client sent a close frame
    ClosedByPeer,
    /// The underlying stream ended without a close frame
    StreamEnded,
    /// Reading from the socket failed
    ReadError(String),
    /// The connection was closed from the write side, or the server is shutting down
    Cancelled,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::ClosedByPeer => f.write_str("closed by peer"),
            CloseReason::StreamEnded => f.write_str("stream ended"),
            CloseReason::ReadError(e) => write!(f, "read error: {}", e),
            CloseReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let supervisor = state.supervisor.clone();
    ws.on_failed_upgrade(move |e| {
        tracing::warn!("WebSocket upgrade failed for {}: {}", remote_addr, e);
    })
    .on_upgrade(move |socket| supervisor.track(handle_socket(socket, state, remote_addr)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote_addr: SocketAddr) {
    let (sender, mut receiver) = socket.split();

    let connection = Arc::new(WebSocketConnection::new(
        ConnectionId::generate(),
        Some(remote_addr),
        sender,
        state.supervisor.child_token(),
    ));
    let cancel = connection.cancellation();

    state
        .connect_client_usecase
        .execute(connection.clone())
        .await;

    let reason = run_read_loop(&mut receiver, &cancel).await;
    tracing::debug!(
        "Read loop for connection {} ended: {}",
        connection.id(),
        reason
    );

    state
        .disconnect_client_usecase
        .execute(connection.as_ref())
        .await;
}

/// Drain inbound frames until the client goes away or `cancel` fires
pub(crate) async fn run_read_loop<S, E>(stream: &mut S, cancel: &CancellationToken) -> CloseReason
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    tokio::select! {
        reason = read_until_closed(stream) => reason,
        _ = cancel.cancelled() => CloseReason::Cancelled,
    }
}

/// Read and discard frames until a close frame, end of stream, or read error
async fn read_until_closed<S, E>(stream: &mut S) -> CloseReason
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => return CloseReason::ClosedByPeer,
            Ok(Message::Text(text)) => {
                tracing::debug!("Discarding inbound text frame ({} bytes)", text.len());
            }
            Ok(Message::Binary(data)) => {
                tracing::debug!("Discarding inbound binary frame ({} bytes)", data.len());
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                tracing::trace!("Received ping/pong");
            }
            Err(e) => return CloseReason::ReadError(e.to_string()),
        }
    }
    CloseReason::StreamEnded
}
