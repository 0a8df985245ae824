//! UseCase: クライアント接続処理
//!
//! ## 処理の流れ
//!
//! 1. `authorize`: ハンドシェイクのセッションを検証（失敗時は登録しない）
//! 2. `execute`: Registry に登録 → welcome をキューに積む → MessagePusher に送信チャンネルを登録
//!
//! 検証と登録を分けているのは、検証失敗を WebSocket のアップグレード前に
//! HTTP ステータスとして返すためです。

use std::sync::Arc;

use venuecast_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionMetadata, HubRepository, Identity, MessagePusher, PusherChannel,
    Timestamp,
};

use super::{
    error::ConnectError,
    validate_session::{Handshake, SessionValidator},
};

/// 登録済みクライアントの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredClient {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    validator: SessionValidator,
    /// Repository（接続レジストリ・ルーム状態の抽象化）
    repository: Arc<dyn HubRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        validator: SessionValidator,
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            validator,
            repository,
            message_pusher,
            clock,
        }
    }

    /// ハンドシェイクのセッションを検証し、identity を返す
    pub async fn authorize(&self, handshake: &Handshake) -> Result<Identity, ConnectError> {
        Ok(self.validator.validate(handshake).await?)
    }

    /// 接続を登録し、welcome メッセージを送信する
    ///
    /// # Arguments
    ///
    /// * `identity` - `authorize` で得た identity
    /// * `metadata` - 接続元アドレスなどのメタデータ
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    /// * `render_welcome` - 割り当てた ConnectionId から welcome メッセージ（JSON）を生成する
    pub async fn execute(
        &self,
        identity: Identity,
        metadata: ConnectionMetadata,
        sender: PusherChannel,
        render_welcome: impl FnOnce(&ConnectionId) -> String + Send,
    ) -> RegisteredClient {
        let connected_at = Timestamp::new(self.clock.now_millis());

        // 1. Registry に登録
        let id = self
            .repository
            .register(identity.clone(), metadata.clone(), connected_at)
            .await;

        // 2. welcome をチャンネルに入れる
        //    MessagePusher への登録前なので、どのブロードキャストよりも先に届く
        if let Err(e) = sender.send(render_welcome(&id)) {
            tracing::warn!("Failed to queue welcome for '{}': {}", id, e);
        }

        // 3. MessagePusher に送信チャンネルを登録
        self.message_pusher.register_client(id.clone(), sender).await;

        tracing::info!(
            connection_id = %id,
            identity = %identity,
            address = metadata.address.as_deref().unwrap_or("unknown"),
            user_agent = metadata.user_agent.as_deref().unwrap_or("unknown"),
            connected_at = connected_at.value(),
            "New realtime connection registered"
        );

        RegisteredClient { id, connected_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Hub, SessionError, SessionStore},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryHubRepository,
            session::InMemorySessionStore,
        },
    };
    use std::{collections::HashMap, time::Duration};
    use tokio::sync::{Mutex, mpsc};
    use venuecast_shared::time::FixedClock;

    struct Fixture {
        usecase: ConnectClientUseCase,
        repository: Arc<InMemoryHubRepository>,
        sessions: Arc<InMemorySessionStore>,
    }

    fn create_fixture() -> Fixture {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(5_000));
        let repository = Arc::new(InMemoryHubRepository::new(Arc::new(Mutex::new(Hub::new()))));
        let sessions = Arc::new(InMemorySessionStore::new(
            clock.clone(),
            Duration::from_secs(60),
        ));
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let usecase = ConnectClientUseCase::new(
            SessionValidator::new(sessions.clone(), clock.clone()),
            repository.clone(),
            pusher,
            clock,
        );
        Fixture {
            usecase,
            repository,
            sessions,
        }
    }

    #[tokio::test]
    async fn test_authorize_and_register_sends_welcome_first() {
        // テスト項目: 認証済みクライアントが登録され、最初に welcome を受け取る
        // given (前提条件):
        let fixture = create_fixture();
        let session = fixture
            .sessions
            .issue(Identity::new("alice".to_string()).unwrap())
            .await;
        let handshake = Handshake {
            session_cookie: Some(session.token.as_str().to_string()),
            ..Handshake::default()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let identity = fixture.usecase.authorize(&handshake).await.unwrap();
        let registered = fixture
            .usecase
            .execute(identity, handshake.metadata.clone(), tx, |id| {
                format!("welcome:{id}")
            })
            .await;

        // then (期待する結果):
        assert_eq!(registered.connected_at, Timestamp::new(5_000));
        let connection = fixture.repository.lookup(&registered.id).await.unwrap();
        assert_eq!(connection.identity.as_str(), "alice");
        assert_eq!(rx.recv().await, Some(format!("welcome:{}", registered.id)));
    }

    #[tokio::test]
    async fn test_unauthenticated_handshake_creates_no_entry() {
        // テスト項目: 資格情報の無いハンドシェイクは拒否され、登録されない
        // given (前提条件):
        let fixture = create_fixture();

        // when (操作):
        let result = fixture.usecase.authorize(&Handshake::default()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::Session(SessionError::Unauthenticated))
        );
        assert!(fixture.repository.all_connection_ids().await.is_empty());
    }
}
