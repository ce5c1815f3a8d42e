//! ブロードキャストエンジン
//!
//! ## 責務
//!
//! - レジストリのスナップショットを取り、全メンバーへ1回ずつ書き込む
//! - 1つのコネクションの送信失敗が他のコネクションへの送信を妨げないようにする
//! - 送信に失敗したコネクションをクローズし、ライブのレジストリから削除する
//!
//! ## 配信セマンティクス
//!
//! ベストエフォート。戻り値の `attempted` はスナップショット時点のメンバー数であり、
//! 実際に届いた数ではない。

use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;

use crate::domain::{Connection, ConnectionId, EventMessage, TransportError};

use super::registry::ConnectionRegistry;

/// 1回のブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// スナップショット時点のメンバー数（送信を試みた数）
    pub attempted: usize,
    /// 書き込みが成功した数
    pub delivered: usize,
    /// 書き込みに失敗し、削除されたコネクション
    pub failed: Vec<ConnectionId>,
}

/// ブロードキャストエンジン
pub struct BroadcastEngine {
    registry: Arc<ConnectionRegistry>,
    /// 1コネクションあたりの書き込み上限時間（`None` なら無制限）
    write_timeout: Option<Duration>,
}

impl BroadcastEngine {
    pub fn new(registry: Arc<ConnectionRegistry>, write_timeout: Option<Duration>) -> Self {
        Self {
            registry,
            write_timeout,
        }
    }

    /// メッセージをスナップショット時点の全コネクションへ送信
    ///
    /// 各コネクションへの書き込みは並行に行われ、レジストリのロックは保持しない。
    /// 失敗したコネクションは全送信の完了後にクローズ・削除される。
    pub async fn broadcast(&self, message: &EventMessage) -> BroadcastReport {
        let targets = self.registry.snapshot().await;
        let attempted = targets.len();
        if attempted == 0 {
            tracing::debug!("No connections to receive event '{}'", message.event_id());
            return BroadcastReport::default();
        }

        let text = message.text();
        let results = join_all(targets.iter().map(|conn| self.deliver(conn.as_ref(), text))).await;

        let mut failed = Vec::new();
        for (conn, result) in targets.iter().zip(results) {
            match result {
                Ok(()) => {
                    tracing::debug!(
                        "Broadcasted event '{}' to connection {}",
                        message.event_id(),
                        conn.id()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to send event '{}' to connection {} ({}): {}",
                        message.event_id(),
                        conn.id(),
                        describe_addr(conn.as_ref()),
                        e
                    );
                    failed.push(conn);
                }
            }
        }

        // 失敗したコネクションは並行にクローズする
        join_all(failed.iter().map(|conn| conn.close())).await;

        // スナップショットではなくライブのレジストリから削除する
        let failed: Vec<ConnectionId> = failed.iter().map(|conn| conn.id()).collect();
        for id in &failed {
            self.registry.remove(id).await;
        }

        let report = BroadcastReport {
            attempted,
            delivered: attempted - failed.len(),
            failed,
        };
        tracing::info!(
            "Broadcasted event '{}': attempted={}, delivered={}, failed={}",
            message.event_id(),
            report.attempted,
            report.delivered,
            report.failed.len()
        );
        report
    }

    async fn deliver(&self, conn: &dyn Connection, text: &str) -> Result<(), TransportError> {
        match self.write_timeout {
            Some(limit) => tokio::time::timeout(limit, conn.send_text(text))
                .await
                .map_err(|_| TransportError::Timeout(limit.as_millis() as u64))?,
            None => conn.send_text(text).await,
        }
    }
}

fn describe_addr(conn: &dyn Connection) -> String {
    conn.remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown address".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{EventId, EventTimestamp},
        infrastructure::fake::FakeConnection,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - スナップショットの全メンバーへの送信
    // - 送信失敗の分離（失敗したコネクションが他への送信を妨げない）
    // - 失敗したコネクションのクローズとレジストリからの削除
    // - 書き込みタイムアウト
    //
    // 【どのようなシナリオをテストするか】
    // 1. 接続0件
    // 2. 全て成功
    // 3. 正常 N 件の中に常に失敗する1件
    // 4. 全て失敗
    // 5. 応答しないコネクション
    // 6. クローズに時間がかかる失敗コネクションが複数
    // ========================================

    fn lap_message(id: &str) -> EventMessage {
        EventMessage::new(
            EventId::new(id.to_string()).unwrap(),
            EventTimestamp::new("2024-01-01T00:00:00Z".to_string()),
        )
    }

    fn create_engine(
        write_timeout: Option<Duration>,
    ) -> (BroadcastEngine, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let engine = BroadcastEngine::new(registry.clone(), write_timeout);
        (engine, registry)
    }

    #[tokio::test]
    async fn test_broadcast_with_no_connections() {
        // テスト項目: 接続が0件でもエラーにならず attempted は 0
        // given (前提条件):
        let (engine, _registry) = create_engine(None);

        // when (操作):
        let report = engine.broadcast(&lap_message("42")).await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_every_connection() {
        // テスト項目: 全コネクションに同じテキストが1回ずつ届く
        // given (前提条件):
        let (engine, registry) = create_engine(None);
        let conns: Vec<_> = (0..3).map(|_| FakeConnection::healthy()).collect();
        for conn in &conns {
            registry.add(conn.clone()).await;
        }

        // when (操作):
        let report = engine.broadcast(&lap_message("42")).await;

        // then (期待する結果):
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 3);
        assert!(report.failed.is_empty());
        for conn in &conns {
            assert_eq!(
                conn.received(),
                vec!["Car 42 crossed at 2024-01-01T00:00:00Z".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_broadcast_isolates_failing_connection() {
        // テスト項目: 常に失敗する1件が混ざっていても、残りの全コネクションに届く
        // given (前提条件):
        let (engine, registry) = create_engine(None);
        let healthy: Vec<_> = (0..4).map(|_| FakeConnection::healthy()).collect();
        let broken = FakeConnection::failing();
        registry.add(healthy[0].clone()).await;
        registry.add(healthy[1].clone()).await;
        registry.add(broken.clone()).await;
        registry.add(healthy[2].clone()).await;
        registry.add(healthy[3].clone()).await;

        // when (操作):
        let report = engine.broadcast(&lap_message("7")).await;

        // then (期待する結果):
        assert_eq!(report.attempted, 5);
        assert_eq!(report.delivered, 4);
        assert_eq!(report.failed, vec![broken.id()]);
        for conn in &healthy {
            assert_eq!(conn.received().len(), 1);
        }
        assert!(broken.is_closed());
        assert!(!registry.contains(&broken.id()).await);
        assert_eq!(registry.len().await, 4);
    }

    #[tokio::test]
    async fn test_broadcast_attempted_counts_even_when_all_fail() {
        // テスト項目: 全件失敗しても attempted はスナップショット時点のメンバー数になる
        // given (前提条件):
        let (engine, registry) = create_engine(None);
        for _ in 0..3 {
            registry.add(FakeConnection::failing()).await;
        }

        // when (操作):
        let report = engine.broadcast(&lap_message("1")).await;

        // then (期待する結果):
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed.len(), 3);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_connection_removed_once_despite_read_loop_removal() {
        // テスト項目: 読み取りループ側が先に削除していても、ブロードキャスト側の削除は安全に何もしない
        // given (前提条件):
        let (engine, registry) = create_engine(None);
        let broken = FakeConnection::failing();
        registry.add(broken.clone()).await;
        let snapshot_holder = registry.snapshot().await;

        // when (操作):
        registry.remove(&broken.id()).await;
        let report = engine.broadcast(&lap_message("3")).await;

        // then (期待する結果):
        assert_eq!(snapshot_holder.len(), 1);
        assert_eq!(report.attempted, 0);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_broadcast_times_out_stalled_connection() {
        // テスト項目: 応答しないコネクションは書き込みタイムアウトで失敗扱いになり、他への送信は完了する
        // given (前提条件):
        let (engine, registry) = create_engine(Some(Duration::from_millis(50)));
        let stalled = FakeConnection::stalled();
        let healthy = FakeConnection::healthy();
        registry.add(stalled.clone()).await;
        registry.add(healthy.clone()).await;

        // when (操作):
        let report = engine.broadcast(&lap_message("9")).await;

        // then (期待する結果):
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, vec![stalled.id()]);
        assert_eq!(stalled.close_calls(), 1);
        assert_eq!(healthy.received().len(), 1);
        assert!(!registry.contains(&stalled.id()).await);
    }

    #[tokio::test]
    async fn test_broadcast_closes_failed_connections_concurrently() {
        // テスト項目: 失敗したコネクションのクローズは並行に行われ、応答時間が失敗件数に比例しない
        // given (前提条件):
        let (engine, registry) = create_engine(None);
        let close_delay = Duration::from_millis(300);
        let broken: Vec<_> = (0..5)
            .map(|_| FakeConnection::failing_slow_close(close_delay))
            .collect();
        for conn in &broken {
            registry.add(conn.clone()).await;
        }

        // when (操作):
        let started = std::time::Instant::now();
        let report = engine.broadcast(&lap_message("5")).await;
        let elapsed = started.elapsed();

        // then (期待する結果):
        assert_eq!(report.attempted, 5);
        assert_eq!(report.failed.len(), 5);
        assert!(
            elapsed < close_delay * 3,
            "closes should overlap, took {:?}",
            elapsed
        );
        for conn in &broken {
            assert_eq!(conn.close_calls(), 1);
        }
        assert!(registry.is_empty().await);
    }
}
