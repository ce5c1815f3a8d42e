//! UseCase 層
//!
//! UI 層（ハンドラー）から呼ばれるアプリケーションの操作を定義します。

mod connect_client;
mod disconnect_client;
mod error;
mod get_connections;
mod submit_event;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::SubmitEventError;
pub use get_connections::{ConnectionSummary, GetConnectionsUseCase};
pub use submit_event::{SubmitEventOutcome, SubmitEventUseCase};
