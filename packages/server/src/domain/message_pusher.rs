//! MessagePusher trait 定義
//!
//! 接続中のクライアントへメッセージを送る手段の抽象化です。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, DeliveryReport, MessagePushError};

/// Outbound channel of one connection. The receiving half is drained into
/// the socket by that connection's push loop.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除（冪等）
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(&self, client_id: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信
    ///
    /// 個々の送信失敗はレポートに記録されるだけで、残りの送信は継続されます。
    async fn broadcast(&self, targets: &[ConnectionId], content: &str) -> DeliveryReport;
}
