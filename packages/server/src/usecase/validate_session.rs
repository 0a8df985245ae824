//! Session Validator: the gate every handshake passes before a connection is
//! registered.

use std::sync::Arc;

use venuecast_shared::time::Clock;

use crate::domain::{
    ConnectionMetadata, Identity, SessionError, SessionStore, SessionToken, Timestamp,
};

/// Raw handshake data captured by the transport.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    /// Value of the session cookie, if present
    pub session_cookie: Option<String>,
    /// Raw `Authorization` header, if present
    pub authorization: Option<String>,
    pub metadata: ConnectionMetadata,
}

impl Handshake {
    /// The cookie wins over a bearer token. The auth scheme is matched
    /// case-insensitively. Blank values count as absent.
    fn credential(&self) -> Option<&str> {
        let from_cookie = self
            .session_cookie
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let from_header = self
            .authorization
            .as_deref()
            .and_then(|value| value.trim().split_once(char::is_whitespace))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|value| !value.is_empty());
        from_cookie.or(from_header)
    }
}

pub struct SessionValidator {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Read-only check of the handshake's credential.
    pub async fn validate(&self, handshake: &Handshake) -> Result<Identity, SessionError> {
        let raw = handshake.credential().ok_or(SessionError::Unauthenticated)?;
        let token = SessionToken::parse(raw).map_err(|_| SessionError::SessionInvalid)?;
        let session = self
            .store
            .find(&token)
            .await
            .ok_or(SessionError::SessionInvalid)?;

        if session.is_expired_at(Timestamp::new(self.clock.now_millis())) {
            return Err(SessionError::SessionExpired);
        }
        Ok(session.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session::InMemorySessionStore;
    use std::time::Duration;
    use venuecast_shared::time::FixedClock;

    const ISSUED_AT: i64 = 1_000_000;
    const TTL_SECS: u64 = 60;

    async fn issue_token(store: &InMemorySessionStore) -> String {
        store
            .issue(Identity::new("alice".to_string()).unwrap())
            .await
            .token
            .as_str()
            .to_string()
    }

    fn create_store() -> Arc<InMemorySessionStore> {
        Arc::new(InMemorySessionStore::new(
            Arc::new(FixedClock::new(ISSUED_AT)),
            Duration::from_secs(TTL_SECS),
        ))
    }

    fn validator_at(store: Arc<InMemorySessionStore>, now: i64) -> SessionValidator {
        SessionValidator::new(store, Arc::new(FixedClock::new(now)))
    }

    fn with_cookie(token: &str) -> Handshake {
        Handshake {
            session_cookie: Some(token.to_string()),
            ..Handshake::default()
        }
    }

    #[tokio::test]
    async fn test_valid_cookie_returns_identity() {
        // テスト項目: 有効なセッション Cookie から identity が得られる
        // given (前提条件):
        let store = create_store();
        let token = issue_token(&store).await;
        let validator = validator_at(store, ISSUED_AT + 1);

        // when (操作):
        let result = validator.validate(&with_cookie(&token)).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Identity::new("alice".to_string()).unwrap()));
    }

    #[tokio::test]
    async fn test_bearer_header_is_accepted() {
        // テスト項目: Cookie が無くても Bearer トークンで認証できる
        // given (前提条件):
        let store = create_store();
        let token = issue_token(&store).await;
        let validator = validator_at(store, ISSUED_AT);
        let handshake = Handshake {
            authorization: Some(format!("Bearer {token}")),
            ..Handshake::default()
        };

        // when (操作):
        let result = validator.validate(&handshake).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_lowercase_bearer_scheme_is_accepted() {
        // テスト項目: 認証スキームは大文字小文字を区別しない
        // given (前提条件):
        let store = create_store();
        let token = issue_token(&store).await;
        let validator = validator_at(store, ISSUED_AT);
        let handshake = Handshake {
            authorization: Some(format!("bearer {token}")),
            ..Handshake::default()
        };

        // when (操作):
        let result = validator.validate(&handshake).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Identity::new("alice".to_string()).unwrap()));
    }

    #[tokio::test]
    async fn test_missing_credential_is_unauthenticated() {
        // テスト項目: 資格情報が無い場合は Unauthenticated
        // given (前提条件):
        let validator = validator_at(create_store(), ISSUED_AT);
        let handshake = Handshake {
            session_cookie: Some("   ".to_string()),
            authorization: Some("Basic abc".to_string()),
            ..Handshake::default()
        };

        // when (操作):
        let result = validator.validate(&handshake).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        // テスト項目: 有効期限を過ぎたセッションは SessionExpired
        // given (前提条件):
        let store = create_store();
        let token = issue_token(&store).await;
        let validator = validator_at(store, ISSUED_AT + (TTL_SECS as i64) * 1000);

        // when (操作):
        let result = validator.validate(&with_cookie(&token)).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::SessionExpired));
    }

    #[tokio::test]
    async fn test_malformed_token_is_invalid() {
        // テスト項目: 形式が不正なトークンは SessionInvalid
        // given (前提条件):
        let validator = validator_at(create_store(), ISSUED_AT);

        // when (操作):
        let result = validator.validate(&with_cookie("s%3Agarbage.signature")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::SessionInvalid));
    }

    #[tokio::test]
    async fn test_unknown_token_is_invalid() {
        // テスト項目: 発行されていないトークンは SessionInvalid
        // given (前提条件):
        let validator = validator_at(create_store(), ISSUED_AT);
        let token = SessionToken::generate();

        // when (操作):
        let result = validator.validate(&with_cookie(token.as_str())).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::SessionInvalid));
    }
}
