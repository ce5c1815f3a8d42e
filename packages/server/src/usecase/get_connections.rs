//! UseCase: 接続中クライアント一覧の取得（診断用）

use std::{net::SocketAddr, sync::Arc};

use crate::{
    domain::{Connection, ConnectionId},
    infrastructure::ConnectionRegistry,
};

/// 接続中クライアントの概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub remote_addr: Option<SocketAddr>,
}

/// 接続中クライアント一覧取得のユースケース
pub struct GetConnectionsUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl GetConnectionsUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続中クライアントの一覧を ID 順で返す
    pub async fn execute(&self) -> Vec<ConnectionSummary> {
        let mut summaries: Vec<ConnectionSummary> = self
            .registry
            .snapshot()
            .await
            .iter()
            .map(|conn| ConnectionSummary {
                id: conn.id(),
                remote_addr: conn.remote_addr(),
            })
            .collect();
        summaries.sort_by_key(|s| s.id);
        summaries
    }
}
