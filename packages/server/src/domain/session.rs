//! Session credentials and the authentication collaborator that issues them.

use async_trait::async_trait;

use super::{Identity, SessionToken, Timestamp};

/// A server-issued credential bound to one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub identity: Identity,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Session {
    /// Expiry is exclusive: a session is dead at exactly `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Authentication subsystem as seen from the realtime core. The core only
/// ever reads sessions; issuing and revoking belong to the auth side.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn issue(&self, identity: Identity) -> Session;

    async fn find(&self, token: &SessionToken) -> Option<Session>;

    async fn revoke(&self, token: &SessionToken);

    /// Drop expired sessions and return how many were removed.
    async fn purge_expired(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_expiring_at(expires_at: i64) -> Session {
        Session {
            token: SessionToken::generate(),
            identity: Identity::new("alice".to_string()).unwrap(),
            issued_at: Timestamp::new(0),
            expires_at: Timestamp::new(expires_at),
        }
    }

    #[test]
    fn test_session_is_live_before_expiry() {
        // テスト項目: 有効期限前のセッションは期限切れではない
        // given (前提条件):
        let session = session_expiring_at(1000);

        // when (操作):
        let expired = session.is_expired_at(Timestamp::new(999));

        // then (期待する結果):
        assert!(!expired);
    }

    #[test]
    fn test_session_is_expired_at_expiry() {
        // テスト項目: 有効期限ちょうどでセッションは期限切れになる
        // given (前提条件):
        let session = session_expiring_at(1000);

        // when (操作):
        let expired = session.is_expired_at(Timestamp::new(1000));

        // then (期待する結果):
        assert!(expired);
    }
}
