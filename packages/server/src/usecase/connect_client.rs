//! UseCase: クライアント接続処理
//!
//! 受け付けた WebSocket コネクションをレジストリに登録し、以後のブロードキャストの対象にします。

use std::sync::Arc;

use crate::{
    domain::{Connection, ConnectionId},
    infrastructure::ConnectionRegistry,
};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl ConnectClientUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// コネクションを登録する
    ///
    /// # Returns
    ///
    /// 登録したコネクションの ID
    pub async fn execute(&self, connection: Arc<dyn Connection>) -> ConnectionId {
        let id = connection.id();
        let remote_addr = connection.remote_addr();
        self.registry.add(connection).await;

        match remote_addr {
            Some(addr) => tracing::info!("Client connected: {} ({})", addr, id),
            None => tracing::info!("Client connected: {}", id),
        }
        id
    }
}
