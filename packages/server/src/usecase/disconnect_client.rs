//! UseCase: クライアント切断処理
//!
//! 読み取りループが切断を検知したときに呼ばれます。レジストリからの登録解除と
//! トランスポートのクローズを行います。どちらも冪等なので、ブロードキャスト失敗時の
//! 削除と重なっても安全です。

use std::sync::Arc;

use crate::{domain::Connection, infrastructure::ConnectionRegistry};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// コネクションの登録を解除してクローズする
    ///
    /// # Returns
    ///
    /// このUseCaseがレジストリから削除した場合は `true`。既にブロードキャスト側で
    /// 削除済みの場合は `false`
    pub async fn execute(&self, connection: &dyn Connection) -> bool {
        let id = connection.id();
        let removed = self.registry.remove(&id).await;
        connection.close().await;

        match connection.remote_addr() {
            Some(addr) => tracing::info!("Client disconnected: {} ({})", addr, id),
            None => tracing::info!("Client disconnected: {}", id),
        }
        removed
    }
}
