//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{StorageError, ValidationError};

/// イベント受付のエラー
///
/// どちらの場合もブロードキャストは一切行われない。
#[derive(Debug, Error)]
pub enum SubmitEventError {
    /// 送信者側の誤り（400）
    #[error("invalid event id: {0}")]
    InvalidEventId(#[from] ValidationError),

    /// サーバー側の誤り（500）
    #[error("failed to persist attachments: {0}")]
    Storage(#[from] StorageError),
}
