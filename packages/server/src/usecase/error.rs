//! UseCase errors.

use thiserror::Error;

use crate::domain::{RepositoryError, SessionError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("invalid room id: {0}")]
    InvalidRoom(String),
    #[error("connection '{0}' is not registered")]
    UnknownConnection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnounceError {
    #[error("connection '{0}' is not registered")]
    UnknownConnection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("originating connection '{0}' is not registered")]
    UnknownConnection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueSessionError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevokeSessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
    #[error("room not found")]
    RoomNotFound,
}

impl From<RepositoryError> for MembershipError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownConnection(id) => Self::UnknownConnection(id),
        }
    }
}

impl From<RepositoryError> for AnnounceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownConnection(id) => Self::UnknownConnection(id),
        }
    }
}
