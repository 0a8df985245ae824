//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 各接続の `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! チャンネルへの送信はブロックしないため、遅い受信者が他の受信者への配信を止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DeliveryOutcome, DeliveryReport, MessagePushError, MessagePusher, PusherChannel,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.push_to(&connection_id, r#"{"event":"welcome","data":{}}"#).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], content: &str) -> DeliveryReport {
        let clients = self.clients.lock().await;
        let mut report = DeliveryReport::default();

        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容し、残りの送信を続ける
            let outcome = match clients.get(target) {
                Some(sender) => match sender.send(content.to_string()) {
                    Ok(()) => DeliveryOutcome::Delivered,
                    Err(e) => DeliveryOutcome::Dropped(MessagePushError::PushFailed(e.to_string())),
                },
                None => DeliveryOutcome::Dropped(MessagePushError::ClientNotFound(
                    target.to_string(),
                )),
            };

            match &outcome {
                DeliveryOutcome::Delivered => {
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
                DeliveryOutcome::Dropped(e) => {
                    tracing::warn!("Dropped broadcast to client '{}': {}", target, e);
                }
            }
            report.record(target.clone(), outcome);
        }

        report
    }
}
