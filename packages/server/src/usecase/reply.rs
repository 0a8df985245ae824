//! UseCase: 送信元クライアントへの返信
//!
//! エコー・参加/退出の確認・エラー通知など、1 つの接続だけに返すメッセージに使います。
//! 返信もブロードキャストと同じ送信チャンネルを通るため、接続ごとの順序は保たれます。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher};

pub struct ReplyUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ReplyUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(
        &self,
        client_id: &ConnectionId,
        json_message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(client_id, json_message).await
    }
}
