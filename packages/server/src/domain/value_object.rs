//! 値オブジェクト

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValidationError;

/// コネクションの識別子
///
/// 接続受付時に生成される UUID v4。レジストリのキーとして使用し、
/// 一度削除された ID が再登録されることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい ConnectionId を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// イベント（ラップ）の識別子
///
/// パスセグメントとして受け取り、ブロードキャストのテキストにそのまま埋め込むため、
/// 空文字列・`/`・制御文字を拒否する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId(String);

impl EventId {
    pub const MAX_LEN: usize = 64;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyEventId);
        }
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::EventIdTooLong(len));
        }
        if let Some(c) = value.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(ValidationError::InvalidEventIdChar(c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示用のタイムスタンプ
///
/// 表示のみに使い、順序付けには使わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTimestamp(String);

impl EventTimestamp {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
