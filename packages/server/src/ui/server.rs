//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetConnectionsUseCase, SubmitEventUseCase,
    },
};

use super::{
    handler::{get_connections, health_check, submit_lap, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    supervisor::ConnectionSupervisor,
};

/// Lap event relay server
///
/// This struct holds the use cases and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     submit_event_usecase,
///     get_connections_usecase,
/// );
/// server.run(&ServerConfig::default()).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// SubmitEventUseCase（イベント受付のユースケース）
    submit_event_usecase: Arc<SubmitEventUseCase>,
    /// GetConnectionsUseCase（接続一覧取得のユースケース）
    get_connections_usecase: Arc<GetConnectionsUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_client_usecase` - UseCase for registering accepted connections
    /// * `disconnect_client_usecase` - UseCase for unregistering closed connections
    /// * `submit_event_usecase` - UseCase for event ingestion and broadcast
    /// * `get_connections_usecase` - UseCase for listing connections
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        submit_event_usecase: Arc<SubmitEventUseCase>,
        get_connections_usecase: Arc<GetConnectionsUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            submit_event_usecase,
            get_connections_usecase,
        }
    }

    /// Run the relay server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(
        self,
        config: &ServerConfig,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Lap relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Submit events to: http://{}/lap/{{id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, config, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// When `shutdown` resolves, every connection task is cancelled (closing
    /// and unregistering its connection) and awaited for up to
    /// `config.shutdown_grace`.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        config: &ServerConfig,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let supervisor = ConnectionSupervisor::new();
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            submit_event_usecase: self.submit_event_usecase,
            get_connections_usecase: self.get_connections_usecase,
            supervisor: supervisor.clone(),
        });

        let app = router(app_state, config.max_upload_bytes);

        // WebSocket タスクは HTTP の graceful shutdown の対象外なので、停止シグナルで先にキャンセルする
        let on_shutdown = {
            let supervisor = supervisor.clone();
            async move {
                shutdown.await;
                supervisor.cancel();
            }
        };
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(on_shutdown)
        .await?;

        supervisor.shutdown(config.shutdown_grace).await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Define handlers
fn router(app_state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // イベント受付エンドポイント
        .route(
            "/lap/{id}",
            post(submit_lap).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/connections", get(get_connections))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
