//! Server configuration.

use std::time::Duration;

use crate::domain::RoomId;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SESSION_COOKIE: &str = "venuecast_session";
/// Matches the 6 hour max-age of the session cookie.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Name of the cookie carrying the session token
    pub session_cookie: String,
    pub session_ttl: Duration,
    /// Rooms created at start-up and kept while empty
    pub durable_rooms: Vec<String>,
    /// CORS origin; any origin when unset
    pub allowed_origin: Option<String>,
    /// Mount `POST /api/sessions`
    pub issue_sessions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session_ttl: DEFAULT_SESSION_TTL,
            durable_rooms: Vec::new(),
            allowed_origin: None,
            issue_sessions: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valid durable room ids. Invalid entries are logged and skipped.
    pub fn durable_room_ids(&self) -> Vec<RoomId> {
        self.durable_rooms
            .iter()
            .filter_map(|raw| match RoomId::new(raw.clone()) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("Ignoring durable room '{}': {}", raw, e);
                    None
                }
            })
            .collect()
    }
}
