//! Conversion logic between domain entities and DTOs.

use venuecast_shared::time::timestamp_to_rfc3339;

use crate::domain::{Connection, DeliveryReport, Room, Session};
use crate::infrastructure::dto::http as dto;

impl From<Connection> for dto::ConnectionDto {
    fn from(model: Connection) -> Self {
        Self {
            id: model.id.into_string(),
            identity: model.identity.into_string(),
            display_name: model.display_name.as_str().to_string(),
            address: model.metadata.address,
            user_agent: model.metadata.user_agent,
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
            rooms: model.rooms.into_iter().map(|r| r.into_string()).collect(),
        }
    }
}

impl From<Room> for dto::RoomSummaryDto {
    fn from(model: Room) -> Self {
        Self {
            id: model.id.into_string(),
            durable: model.durable,
            member_count: model.members.len(),
            members: model.members.into_iter().map(|m| m.into_string()).collect(),
        }
    }
}

impl dto::RoomDetailDto {
    /// Build the detail view from a room and its members' records.
    pub fn from_parts(room: Room, members: Vec<Connection>) -> Self {
        Self {
            id: room.id.into_string(),
            durable: room.durable,
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&DeliveryReport> for dto::BroadcastResponseDto {
    fn from(report: &DeliveryReport) -> Self {
        Self {
            delivered: report.delivered_count(),
            dropped: report.dropped_count(),
        }
    }
}

impl From<Session> for dto::IssueSessionResponseDto {
    fn from(model: Session) -> Self {
        Self {
            token: model.token.as_str().to_string(),
            identity: model.identity.into_string(),
            expires_at: timestamp_to_rfc3339(model.expires_at.value()),
        }
    }
}
