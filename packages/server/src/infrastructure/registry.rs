//! 接続レジストリ
//!
//! ## 責務
//!
//! - ブロードキャスト対象となる接続中コネクションの集合を保持
//! - 登録・解除は排他ロック、スナップショット取得は共有ロックで行う
//!
//! ## 設計ノート
//!
//! スナップショットはロック下でコピーを取るだけで、ロックを解放してから返す。
//! ソケットへの書き込みは必ずロックの外で行うこと。遅いクライアントへの書き込み中に
//! ロックを保持すると、新規接続・切断の登録が全て止まる。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::domain::{Connection, ConnectionId};

/// 接続中コネクションのレジストリ
///
/// 同じ ID のエントリが2つ存在することはない。コネクションへの参照を保持するだけで、
/// コネクションのクローズは読み取りループ（または送信失敗時のブロードキャスト）が行う。
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<dyn Connection>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// コネクションを登録
    ///
    /// 既に同じ ID が登録されている場合は上書きする。ID は接続ごとに生成されるため、
    /// これは呼び出し側のバグであり警告を出す。
    pub async fn add(&self, connection: Arc<dyn Connection>) {
        let id = connection.id();
        let mut connections = self.connections.write().await;
        if connections.insert(id, connection).is_some() {
            tracing::warn!("Connection {} was already registered, entry replaced", id);
        }
        tracing::debug!(
            "Connection {} registered ({} active)",
            id,
            connections.len()
        );
    }

    /// コネクションの登録を解除
    ///
    /// 存在しない ID の場合は何もしない。読み取りループとブロードキャスト失敗の
    /// 両方から呼ばれ得るため、何度呼んでも安全。
    ///
    /// # Returns
    ///
    /// 実際にエントリを削除した場合は `true`（ログ用途のみ）
    pub async fn remove(&self, id: &ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(id).is_some();
        if removed {
            tracing::debug!(
                "Connection {} unregistered ({} active)",
                id,
                connections.len()
            );
        }
        removed
    }

    /// 現時点の登録コネクションのコピーを取得
    ///
    /// 共有ロックはコピーの間だけ保持される。順序は不定。
    pub async fn snapshot(&self) -> Vec<Arc<dyn Connection>> {
        let connections = self.connections.read().await;
        connections.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    pub async fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.read().await.contains_key(id)
    }

    pub async fn ids(&self) -> Vec<ConnectionId> {
        self.connections.read().await.keys().copied().collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
