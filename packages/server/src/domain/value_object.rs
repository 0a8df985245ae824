//! Value objects.
//!
//! Every identifier is an opaque string from the core's point of view; the
//! constructors only reject values that can never be valid on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

const ROOM_ID_MAX_LEN: usize = 128;
const EVENT_NAME_MAX_LEN: usize = 64;

/// Display name used until a connection announces one.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown User";

fn non_empty(value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyValue);
    }
    Ok(value)
}

fn bounded(value: String, max: usize) -> Result<String, ValidationError> {
    let value = non_empty(value)?;
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { max, actual: len });
    }
    Ok(value)
}

/// Server-generated connection identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValidationError> {
        non_empty(value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room key, e.g. `hall-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Surrounding whitespace is stripped so `" hall-1"` and `"hall-1"` name
    /// the same room.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        bounded(value.trim().to_string(), ROOM_ID_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity bound to a session by the authentication subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        non_empty(value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable name announced by a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Any non-blank name is accepted as announced, minus surrounding
    /// whitespace.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        non_empty(value.trim().to_string()).map(Self)
    }

    /// Blank or missing announcements fall back to [`UNKNOWN_DISPLAY_NAME`].
    pub fn from_announcement(value: Option<String>) -> Self {
        value
            .and_then(|name| Self::new(name).ok())
            .unwrap_or_else(Self::unknown)
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_DISPLAY_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a broadcast event (`update`, `roomUpdated`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        bounded(value, EVENT_NAME_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque session credential. Well-formed tokens are UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse a raw credential. Only the format is checked here; whether the
    /// token was ever issued is the session store's business.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptyValue);
        }
        Uuid::parse_str(raw)
            .map(|uuid| Self(uuid.hyphenated().to_string()))
            .map_err(|e| ValidationError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
