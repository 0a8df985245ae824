//! Domain errors.

use thiserror::Error;

/// Value object construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value must not be empty")]
    EmptyValue,
    #[error("value is too long ({actual} > {max} characters)")]
    TooLong { max: usize, actual: usize },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Connection-establishment failures. Each one closes the handshake and
/// creates no registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no session credential presented")]
    Unauthenticated,
    #[error("session has expired")]
    SessionExpired,
    #[error("session credential is invalid")]
    SessionInvalid,
}

/// Registry / room state errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is not registered")]
    UnknownConnection(String),
}

/// Per-recipient delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' has no outbound channel")]
    ClientNotFound(String),
    #[error("push failed: {0}")]
    PushFailed(String),
}
