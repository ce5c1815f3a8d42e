//! AssetStore trait 定義
//!
//! 添付ファイルの保存先へのインターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{
    entity::{StoredAsset, UploadedAsset},
    error::StorageError,
    value_object::EventId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// イベントに添付されたファイルを全て永続化する
    ///
    /// 1件でも失敗した場合は `Err` を返し、呼び出し側はブロードキャストを行わない。
    /// 添付が0件の場合は何もせず成功する。
    async fn persist(
        &self,
        event_id: &EventId,
        assets: Vec<UploadedAsset>,
    ) -> Result<Vec<StoredAsset>, StorageError>;
}
