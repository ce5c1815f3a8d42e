//! ドメイン層
//!
//! 値オブジェクト、エンティティ、外部とのポート（trait）、エラー型を定義します。
//! Infrastructure 層はここで定義された trait を実装します（依存性の逆転）。

pub mod connection;
pub mod entity;
pub mod error;
pub mod storage;
pub mod value_object;

pub use connection::Connection;
pub use entity::{EventMessage, StoredAsset, UploadedAsset};
pub use error::{StorageError, TransportError, ValidationError};
pub use storage::AssetStore;
#[cfg(test)]
pub use storage::MockAssetStore;
pub use value_object::{ConnectionId, EventId, EventTimestamp};
