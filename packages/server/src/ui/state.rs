//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetConnectionsUseCase, SubmitEventUseCase,
};

use super::supervisor::ConnectionSupervisor;

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// SubmitEventUseCase（イベント受付のユースケース）
    pub submit_event_usecase: Arc<SubmitEventUseCase>,
    /// GetConnectionsUseCase（接続一覧取得のユースケース）
    pub get_connections_usecase: Arc<GetConnectionsUseCase>,
    /// Tracks every connection task so shutdown can cancel and await them
    pub supervisor: ConnectionSupervisor,
}
