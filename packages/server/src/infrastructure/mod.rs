//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、接続レジストリ・ブロードキャストエンジンを提供します。

pub mod broadcast;
pub mod dto;
pub mod registry;
pub mod storage;
pub mod websocket;

#[cfg(test)]
pub(crate) mod fake;

pub use broadcast::{BroadcastEngine, BroadcastReport};
pub use registry::ConnectionRegistry;
pub use storage::FileSystemAssetStore;
pub use websocket::WebSocketConnection;
