//! ドメイン層のエラー型

use std::path::PathBuf;

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("event id must not be empty")]
    EmptyEventId,

    #[error("event id is too long ({0} chars, max {max})", max = super::value_object::EventId::MAX_LEN)]
    EventIdTooLong(usize),

    #[error("event id contains an invalid character: {0:?}")]
    InvalidEventIdChar(char),
}

/// 個々のコネクションに閉じた送受信エラー
///
/// システム全体の障害として伝播させず、そのコネクションの切断で解決する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection is closed")]
    Closed,

    #[error("write timed out after {0} ms")]
    Timeout(u64),

    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// 添付ファイルの永続化エラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to prepare asset directory {path}: {source}")]
    PrepareDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write asset {path}: {source}")]
    WriteAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset has no usable file name: {0:?}")]
    InvalidFileName(String),
}
