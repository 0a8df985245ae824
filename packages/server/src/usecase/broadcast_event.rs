//! UseCase: Broadcast Dispatcher
//!
//! 宛先を解決し（ルームのメンバー、または全接続）、各受信者に配信します。
//!
//! ## 配信ポリシー
//!
//! - ベストエフォート：受信者ごとの失敗はログに残すだけで、残りの配信は続ける
//! - 失敗は呼び出し元にエラーとして返さない（レポートの件数に現れるだけ）
//! - 再送はしない。切断処理が終われば、その接続は次の配信から自然に外れる
//! - 接続から発信されたイベントは、発信元自身には配信しない

use std::sync::Arc;

use crate::domain::{
    BroadcastEvent, BroadcastTarget, ConnectionId, DeliveryReport, HubRepository, MessagePusher,
};

use super::error::BroadcastError;

pub struct BroadcastEventUseCase {
    /// Repository（宛先の解決に使用）
    repository: Arc<dyn HubRepository>,
    /// MessagePusher（配信に使用）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEventUseCase {
    pub fn new(
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ブロードキャストを実行
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryReport)` - 受信者ごとの配信結果（一部失敗していても Ok）
    /// * `Err(BroadcastError::UnknownConnection)` - 発信元の接続が既に登録されていない
    pub async fn execute(&self, event: BroadcastEvent) -> Result<DeliveryReport, BroadcastError> {
        if let Some(origin) = &event.origin
            && self.repository.lookup(origin).await.is_none()
        {
            tracing::warn!(
                "Skipping broadcast '{}' from unregistered connection '{}'",
                event.event.as_str(),
                origin
            );
            return Err(BroadcastError::UnknownConnection(origin.to_string()));
        }

        let targets = self.resolve_targets(&event).await;
        let report = self
            .message_pusher
            .broadcast(&targets, &event.to_wire())
            .await;

        let target_label = match &event.target {
            BroadcastTarget::Room(room_id) => room_id.as_str(),
            BroadcastTarget::All => "*",
        };
        tracing::info!(
            event = event.event.as_str(),
            target = target_label,
            delivered = report.delivered_count(),
            dropped = report.dropped_count(),
            "Broadcast dispatched"
        );
        Ok(report)
    }

    /// 宛先の ConnectionId リストを取得（発信元を除く）
    async fn resolve_targets(&self, event: &BroadcastEvent) -> Vec<ConnectionId> {
        let mut targets: Vec<ConnectionId> = match &event.target {
            BroadcastTarget::Room(room_id) => {
                self.repository.members_of(room_id).await.into_iter().collect()
            }
            BroadcastTarget::All => self.repository.all_connection_ids().await,
        };
        if let Some(origin) = &event.origin {
            targets.retain(|id| id != origin);
        }
        targets.sort();
        targets
    }
}
