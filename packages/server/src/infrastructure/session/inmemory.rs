//! InMemory SessionStore 実装
//!
//! 認証サブシステムの代わりにセッションを発行・保持します。
//! 有効期限は発行時刻 + TTL で、時刻は注入された `Clock` から取得します。

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;
use venuecast_shared::time::Clock;

use crate::domain::{Identity, Session, SessionStore, SessionToken, Timestamp};

pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionToken, Session>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn issue(&self, identity: Identity) -> Session {
        let issued_at = self.clock.now_millis();
        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let session = Session {
            token: SessionToken::generate(),
            identity,
            issued_at: Timestamp::new(issued_at),
            expires_at: Timestamp::new(issued_at.saturating_add(ttl_millis)),
        };

        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.token.clone(), session.clone());
        tracing::debug!("Issued session for '{}'", session.identity);
        session
    }

    async fn find(&self, token: &SessionToken) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(token).cloned()
    }

    async fn revoke(&self, token: &SessionToken) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(token);
    }

    async fn purge_expired(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }
}
