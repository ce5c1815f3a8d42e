//! エンティティ

use std::path::PathBuf;

use lapcast_shared::protocol::format_crossing;

use super::value_object::{EventId, EventTimestamp};

/// ブロードキャストされるイベントメッセージ
///
/// 受付ごとに一度だけ生成され、以後変更されない。送信テキストは生成時に
/// 一度だけレンダリングする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMessage {
    event_id: EventId,
    timestamp: EventTimestamp,
    text: String,
}

impl EventMessage {
    pub fn new(event_id: EventId, timestamp: EventTimestamp) -> Self {
        let text = format_crossing(event_id.as_str(), timestamp.as_str());
        Self {
            event_id,
            timestamp,
            text,
        }
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn timestamp(&self) -> &EventTimestamp {
        &self.timestamp
    }

    /// クライアントへ送るテキストフレームの内容
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// イベントに添付されたバイナリ（画像など）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedAsset {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// 永続化済みの添付ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub path: PathBuf,
    pub size: usize,
}
