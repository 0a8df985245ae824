//! HTTP API DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub durable: bool,
    pub member_count: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub durable: bool,
    pub members: Vec<ConnectionDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub id: String,
    pub identity: String,
    pub display_name: String,
    pub address: Option<String>,
    pub user_agent: Option<String>,
    /// RFC 3339, UTC
    pub connected_at: String,
    pub rooms: Vec<String>,
}

/// Body of a server-originated broadcast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastRequestDto {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastResponseDto {
    pub delivered: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSessionRequestDto {
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSessionResponseDto {
    pub token: String,
    pub identity: String,
    /// RFC 3339, UTC
    pub expires_at: String,
}
