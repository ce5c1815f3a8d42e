//! WebSocket watch session.

use chrono::Utc;
use futures_util::StreamExt;
use lapcast_shared::time::to_rfc3339;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{error::ClientError, formatter::CrossingFormatter};

/// An open connection to the relay's WebSocket endpoint
pub type WatchStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the WebSocket connection for a watch session
pub async fn connect_watch_session(url: &str) -> Result<WatchStream, ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", url);
    println!("\nWatching lap crossings. Press Ctrl+C to exit.\n");
    Ok(ws_stream)
}

/// Print crossings until the user interrupts or the connection drops
///
/// Returns `Ok(())` on Ctrl+C and a [`ClientError::ConnectionError`] when
/// the server closes the socket or the connection fails.
pub async fn run_watch_session(ws_stream: WatchStream) -> Result<(), ClientError> {
    // Nothing is ever sent upstream; only the read half is used.
    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                return Ok(());
            }
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let received_at = to_rfc3339(Utc::now());
                    print!("{}", CrossingFormatter::format_text(text.as_str(), &received_at));
                }
                Some(Ok(Message::Binary(data))) => {
                    print!("{}", CrossingFormatter::format_binary_message(data.len()));
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError(
                        "Server closed the connection".to_string(),
                    ));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                None => {
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
            }
        }
    }
}
