//! Connection trait 定義
//!
//! メッセージ単位で送受信できる双方向トランスポートへのハンドル。
//! レジストリはこのハンドルを参照として保持するだけで、コネクションの
//! ライフサイクル（切断検知と登録解除）は読み取りループが所有します。

use std::net::SocketAddr;

use async_trait::async_trait;

use super::{error::TransportError, value_object::ConnectionId};

#[async_trait]
pub trait Connection: Send + Sync {
    /// レジストリのキーとなる識別子
    fn id(&self) -> ConnectionId;

    /// 接続元アドレス（診断用）
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// テキストフレームを1つ送信
    ///
    /// 遅いクライアントに対してはブロックし得る。呼び出し側はレジストリの
    /// ロックを保持したまま呼んではならない。
    async fn send_text(&self, text: &str) -> Result<(), TransportError>;

    /// トランスポートを閉じる
    ///
    /// 読み取りループとブロードキャスト失敗の両方から呼ばれるため冪等。
    async fn close(&self);

    fn is_closed(&self) -> bool;
}
