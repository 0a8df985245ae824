//! UseCase: セッションの発行・失効と期限切れセッションの掃除
//!
//! 本番では認証サブシステムがセッションを発行します。ここでの発行は
//! 開発・テスト用の入口（`POST /api/sessions`, `DELETE /api/sessions/{token}`）
//! からのみ呼ばれます。

use std::sync::Arc;

use crate::domain::{Identity, Session, SessionStore, SessionToken};

use super::error::{IssueSessionError, RevokeSessionError};

pub struct ManageSessionsUseCase {
    store: Arc<dyn SessionStore>,
}

impl ManageSessionsUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// identity に対してセッションを発行する
    pub async fn issue(&self, identity: String) -> Result<Session, IssueSessionError> {
        let identity = Identity::new(identity)
            .map_err(|e| IssueSessionError::InvalidIdentity(e.to_string()))?;
        let session = self.store.issue(identity).await;
        tracing::info!(
            identity = %session.identity,
            expires_at = session.expires_at.value(),
            "Session issued"
        );
        Ok(session)
    }

    /// セッションを失効させる（存在しないトークンでもエラーにしない）
    ///
    /// 失効後、そのトークンでのハンドシェイクは SessionInvalid になる。
    /// 既に確立済みの接続はそのまま維持される。
    pub async fn revoke(&self, token: &str) -> Result<(), RevokeSessionError> {
        let token = SessionToken::parse(token.trim())
            .map_err(|e| RevokeSessionError::InvalidToken(e.to_string()))?;
        self.store.revoke(&token).await;
        tracing::info!("Session revoked");
        Ok(())
    }

    /// 期限切れセッションを削除し、削除した件数を返す
    pub async fn purge_expired(&self) -> usize {
        let purged = self.store.purge_expired().await;
        if purged > 0 {
            tracing::debug!("Purged {} expired session(s)", purged);
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Timestamp, infrastructure::session::InMemorySessionStore};
    use std::time::Duration;
    use venuecast_shared::time::FixedClock;

    fn create_usecase(now: i64, ttl_secs: u64) -> (ManageSessionsUseCase, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new(
            Arc::new(FixedClock::new(now)),
            Duration::from_secs(ttl_secs),
        ));
        (ManageSessionsUseCase::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_issue_session_for_identity() {
        // テスト項目: identity に対してセッションが発行され、ストアから引ける
        // given (前提条件):
        let (usecase, store) = create_usecase(1_000, 10);

        // when (操作):
        let session = usecase.issue("alice".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(session.identity.as_str(), "alice");
        assert_eq!(session.expires_at, Timestamp::new(11_000));
        assert_eq!(store.find(&session.token).await, Some(session));
    }

    #[tokio::test]
    async fn test_issue_session_rejects_blank_identity() {
        // テスト項目: 空の identity ではセッションを発行しない
        // given (前提条件):
        let (usecase, _store) = create_usecase(1_000, 10);

        // when (操作):
        let result = usecase.issue(String::new()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(IssueSessionError::InvalidIdentity(_))));
    }

    #[tokio::test]
    async fn test_revoke_session_removes_it_from_store() {
        // テスト項目: 失効させたセッションはストアから引けなくなる
        // given (前提条件):
        let (usecase, store) = create_usecase(1_000, 10);
        let session = usecase.issue("alice".to_string()).await.unwrap();

        // when (操作):
        let result = usecase.revoke(session.token.as_str()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(store.find(&session.token).await, None);
    }

    #[tokio::test]
    async fn test_revoke_rejects_malformed_token() {
        // テスト項目: 形式が不正なトークンは InvalidToken
        // given (前提条件):
        let (usecase, _store) = create_usecase(1_000, 10);

        // when (操作):
        let result = usecase.revoke("not-a-token").await;

        // then (期待する結果):
        assert!(matches!(result, Err(RevokeSessionError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_purge_removes_sessions_with_zero_ttl() {
        // テスト項目: TTL 0 で発行したセッションは即座に期限切れとして掃除される
        // given (前提条件):
        let (usecase, _store) = create_usecase(1_000, 0);
        usecase.issue("alice".to_string()).await.unwrap();

        // when (操作):
        let purged = usecase.purge_expired().await;

        // then (期待する結果):
        assert_eq!(purged, 1);
    }
}
