//! UseCase: クライアント切断処理
//!
//! 自発的なクローズでもトランスポートエラーでも、同じ順序で後始末を行います。
//!
//! 1. 全てのルームから退出（leave_all）
//! 2. Registry から削除（unregister）
//! 3. MessagePusher から送信チャンネルを削除
//! 4. ライフサイクルログを出力
//!
//! 切断通知が重複しても 2 回目以降は何もしません。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, HubRepository, MessagePusher, RoomId};

/// 切断結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectSummary {
    pub display_name: DisplayName,
    pub rooms_left: Vec<RoomId>,
}

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（接続レジストリ・ルーム状態の抽象化）
    repository: Arc<dyn HubRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// # Returns
    ///
    /// * `Some(DisconnectSummary)` - 登録されていた接続を削除した
    /// * `None` - 既に削除済み（重複した切断通知）
    pub async fn execute(&self, client_id: &ConnectionId) -> Option<DisconnectSummary> {
        // 1. 全てのルームから退出
        let rooms_left = self.repository.leave_all(client_id).await;

        // 2. Registry から削除
        let removed = self.repository.unregister(client_id).await;

        // 3. 送信チャンネルを削除
        self.message_pusher.unregister_client(client_id).await;

        let Some(connection) = removed else {
            tracing::debug!("Connection '{}' was already disconnected", client_id);
            return None;
        };

        // 4. ライフサイクルログ
        tracing::info!(
            connection_id = %client_id,
            display_name = %connection.display_name,
            rooms_left = rooms_left.len(),
            "User \"{}\" disconnected",
            connection.display_name
        );

        Some(DisconnectSummary {
            display_name: connection.display_name,
            rooms_left,
        })
    }
}
