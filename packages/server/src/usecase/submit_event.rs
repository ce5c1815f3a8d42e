//! UseCase: イベント受付処理
//!
//! ## 処理の流れ
//!
//! 1. イベント ID の検証
//! 2. 添付ファイルの永続化（失敗したらブロードキャストしない）
//! 3. EventMessage の生成（タイムスタンプ省略時はサーバー時刻）
//! 4. ブロードキャスト
//!
//! 受付の呼び出し元にはブロードキャストを試みた数だけを返し、コネクションごとの
//! 成否は返さない。

use std::sync::Arc;

use lapcast_shared::time::{Clock, to_rfc3339};

use crate::{
    domain::{AssetStore, EventId, EventMessage, EventTimestamp, StoredAsset, UploadedAsset},
    infrastructure::{BroadcastEngine, BroadcastReport},
};

use super::error::SubmitEventError;

/// イベント受付の結果
#[derive(Debug, Clone)]
pub struct SubmitEventOutcome {
    pub message: EventMessage,
    pub stored_assets: Vec<StoredAsset>,
    pub broadcast: BroadcastReport,
}

/// イベント受付のユースケース
pub struct SubmitEventUseCase {
    asset_store: Arc<dyn AssetStore>,
    broadcast_engine: Arc<BroadcastEngine>,
    clock: Arc<dyn Clock>,
}

impl SubmitEventUseCase {
    pub fn new(
        asset_store: Arc<dyn AssetStore>,
        broadcast_engine: Arc<BroadcastEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            asset_store,
            broadcast_engine,
            clock,
        }
    }

    /// イベントを受け付け、添付を保存してからブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `event_id` - パスセグメントから取り出したイベント ID（未検証）
    /// * `timestamp` - 表示用タイムスタンプ（`None` または空白のみならサーバー時刻を使う）
    /// * `assets` - 添付ファイル（0件可）
    pub async fn execute(
        &self,
        event_id: String,
        timestamp: Option<String>,
        assets: Vec<UploadedAsset>,
    ) -> Result<SubmitEventOutcome, SubmitEventError> {
        let event_id = EventId::try_from(event_id)?;

        let stored_assets = self.asset_store.persist(&event_id, assets).await?;

        let timestamp = match timestamp {
            Some(t) if !t.trim().is_empty() => t,
            _ => to_rfc3339(self.clock.now()),
        };
        let message = EventMessage::new(event_id, EventTimestamp::new(timestamp));
        let broadcast = self.broadcast_engine.broadcast(&message).await;

        Ok(SubmitEventOutcome {
            message,
            stored_assets,
            broadcast,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        domain::{Connection, MockAssetStore, StorageError, ValidationError},
        infrastructure::{ConnectionRegistry, fake::FakeConnection},
    };
    use chrono::{TimeZone, Utc};
    use lapcast_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 添付の保存 → ブロードキャストの順序
    // - 保存失敗・ID 不正時にブロードキャストが行われないこと
    // - タイムスタンプ省略時のサーバー時刻補完
    // ========================================

    fn create_usecase(store: MockAssetStore) -> (SubmitEventUseCase, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let engine = Arc::new(BroadcastEngine::new(registry.clone(), None));
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
        let usecase = SubmitEventUseCase::new(Arc::new(store), engine, Arc::new(clock));
        (usecase, registry)
    }

    fn store_accepting_everything() -> MockAssetStore {
        let mut store = MockAssetStore::new();
        store.expect_persist().returning(|_, assets| {
            Ok(assets
                .into_iter()
                .map(|a| StoredAsset {
                    path: PathBuf::from("tmp").join(&a.file_name),
                    size: a.bytes.len(),
                })
                .collect())
        });
        store
    }

    #[tokio::test]
    async fn test_submit_event_broadcasts_to_all_connections() {
        // テスト項目: 受け付けたイベントが全コネクションにブロードキャストされる
        // given (前提条件):
        let (usecase, registry) = create_usecase(store_accepting_everything());
        let conns: Vec<_> = (0..3).map(|_| FakeConnection::healthy()).collect();
        for conn in &conns {
            registry.add(conn.clone()).await;
        }

        // when (操作):
        let outcome = usecase
            .execute(
                "42".to_string(),
                Some("2024-01-01T00:00:00Z".to_string()),
                vec![UploadedAsset::new("a.jpg", vec![1])],
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.broadcast.attempted, 3);
        assert_eq!(outcome.stored_assets.len(), 1);
        for conn in &conns {
            assert_eq!(
                conn.received(),
                vec!["Car 42 crossed at 2024-01-01T00:00:00Z".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_submit_event_without_timestamp_uses_server_time() {
        // テスト項目: タイムスタンプ省略時はサーバー時刻（RFC 3339）が使われる
        // given (前提条件):
        let (usecase, registry) = create_usecase(store_accepting_everything());
        let conn = FakeConnection::healthy();
        registry.add(conn.clone()).await;

        // when (操作):
        let outcome = usecase
            .execute("5".to_string(), Some("  ".to_string()), Vec::new())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.message.timestamp().as_str(), "2024-05-06T07:08:09Z");
        assert_eq!(
            conn.received(),
            vec!["Car 5 crossed at 2024-05-06T07:08:09Z".to_string()]
        );
    }

    #[tokio::test]
    async fn test_submit_event_storage_failure_skips_broadcast() {
        // テスト項目: 添付の保存に失敗した場合、ブロードキャストは一切行われない
        // given (前提条件):
        let mut store = MockAssetStore::new();
        store
            .expect_persist()
            .times(1)
            .returning(|_, _| Err(StorageError::InvalidFileName("..".to_string())));
        let (usecase, registry) = create_usecase(store);
        let conn = FakeConnection::healthy();
        registry.add(conn.clone()).await;

        // when (操作):
        let result = usecase
            .execute(
                "42".to_string(),
                None,
                vec![UploadedAsset::new("..", vec![0])],
            )
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(SubmitEventError::Storage(_))));
        assert!(conn.received().is_empty());
        assert!(!conn.is_closed());
    }

    #[tokio::test]
    async fn test_submit_event_invalid_id_is_rejected_before_storage() {
        // テスト項目: 不正なイベント ID は保存前に拒否される
        // given (前提条件):
        let mut store = MockAssetStore::new();
        store.expect_persist().never();
        let (usecase, registry) = create_usecase(store);
        let conn = FakeConnection::healthy();
        registry.add(conn.clone()).await;

        // when (操作):
        let result = usecase.execute("".to_string(), None, Vec::new()).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(SubmitEventError::InvalidEventId(ValidationError::EmptyEventId))
        ));
        assert!(conn.received().is_empty());
    }

    #[tokio::test]
    async fn test_submit_event_reports_attempted_not_delivered() {
        // テスト項目: 受付結果の件数は送信を試みた数（失敗したコネクションも含む）
        // given (前提条件):
        let (usecase, registry) = create_usecase(store_accepting_everything());
        let healthy = FakeConnection::healthy();
        let broken = FakeConnection::failing();
        registry.add(healthy.clone()).await;
        registry.add(broken.clone()).await;

        // when (操作):
        let outcome = usecase
            .execute("8".to_string(), Some("t".to_string()), Vec::new())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.broadcast.attempted, 2);
        assert_eq!(outcome.broadcast.delivered, 1);
        assert_eq!(registry.ids().await, vec![healthy.id()]);
    }
}
