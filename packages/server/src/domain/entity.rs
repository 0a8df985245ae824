//! Entities.

use std::collections::BTreeSet;

use serde_json::{Value, json};

use super::{
    error::MessagePushError,
    value_object::{ConnectionId, DisplayName, EventName, Identity, RoomId, Timestamp},
};

/// Network metadata captured from the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionMetadata {
    /// Origin address (peer socket or first `X-Forwarded-For` hop)
    pub address: Option<String>,
    /// Client descriptor (`User-Agent`)
    pub user_agent: Option<String>,
}

/// A live realtime client session, owned by the connection registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Identity the session credential was issued to
    pub identity: Identity,
    /// Announced display name, `Unknown User` until announced
    pub display_name: DisplayName,
    pub metadata: ConnectionMetadata,
    pub connected_at: Timestamp,
    /// Mirror of this connection's presence in each room's member set
    pub rooms: BTreeSet<RoomId>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        identity: Identity,
        metadata: ConnectionMetadata,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            identity,
            display_name: DisplayName::unknown(),
            metadata,
            connected_at,
            rooms: BTreeSet::new(),
        }
    }
}

/// Named group of connections receiving the same broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    /// Durable rooms map to persistent external entities and survive
    /// becoming empty.
    pub durable: bool,
    pub members: BTreeSet<ConnectionId>,
}

impl Room {
    pub fn ad_hoc(id: RoomId) -> Self {
        Self {
            id,
            durable: false,
            members: BTreeSet::new(),
        }
    }

    pub fn durable(id: RoomId) -> Self {
        Self {
            id,
            durable: true,
            members: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Who a broadcast goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastTarget {
    Room(RoomId),
    /// Every registered connection
    All,
}

/// Ephemeral update event pushed to room members.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastEvent {
    pub target: BroadcastTarget,
    pub event: EventName,
    pub payload: Value,
    /// `None` for server-originated events
    pub origin: Option<ConnectionId>,
}

impl BroadcastEvent {
    pub fn to_room(room_id: RoomId, event: EventName, payload: Value) -> Self {
        Self {
            target: BroadcastTarget::Room(room_id),
            event,
            payload,
            origin: None,
        }
    }

    pub fn to_all(event: EventName, payload: Value) -> Self {
        Self {
            target: BroadcastTarget::All,
            event,
            payload,
            origin: None,
        }
    }

    pub fn from_connection(mut self, origin: ConnectionId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Frame delivered to recipients: `{"event": .., "data": ..}`.
    pub fn to_wire(&self) -> String {
        json!({ "event": self.event.as_str(), "data": self.payload }).to_string()
    }
}

/// Terminal state of a single delivery attempt. There is no retry
/// transition out of either state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Dropped(MessagePushError),
}

/// Per-recipient results of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcomes: Vec<(ConnectionId, DeliveryOutcome)>,
}

impl DeliveryReport {
    pub fn record(&mut self, recipient: ConnectionId, outcome: DeliveryOutcome) {
        self.outcomes.push((recipient, outcome));
    }

    pub fn delivered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DeliveryOutcome::Delivered))
            .count()
    }

    pub fn dropped_count(&self) -> usize {
        self.outcomes.len() - self.delivered_count()
    }

    pub fn delivered_to(&self) -> Vec<&ConnectionId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DeliveryOutcome::Delivered))
            .map(|(id, _)| id)
            .collect()
    }
}
