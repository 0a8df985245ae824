//! WebSocket frame DTOs.
//!
//! Inbound frames are either control messages tagged with `type`, or
//! application messages of any shape. Outbound frames are always
//! `{"event": .., "data": ..}`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const CONTROL_TYPES: [&str; 4] = ["user-connected", "join", "leave", "broadcast"];

/// Control messages understood by the realtime core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControlMessage {
    /// Late identity announcement
    UserConnected {
        #[serde(default)]
        name: Option<String>,
    },
    Join {
        room: String,
    },
    Leave {
        room: String,
    },
    /// Peer-originated broadcast; no room means every connection
    Broadcast {
        #[serde(default)]
        room: Option<String>,
        event: String,
        #[serde(default)]
        data: Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Control(ControlMessage),
    /// Anything that is not a control message; relayed without envelope
    Application(Value),
    /// A control `type` whose fields did not parse
    Malformed(String),
}

/// Classify a text frame. Non-JSON text becomes a JSON string.
pub fn parse_inbound(text: &str) -> InboundFrame {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => return InboundFrame::Application(Value::String(text.to_string())),
    };

    let is_control = value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|kind| CONTROL_TYPES.contains(&kind));
    if !is_control {
        return InboundFrame::Application(value);
    }

    match serde_json::from_value::<ControlMessage>(value) {
        Ok(message) => InboundFrame::Control(message),
        Err(e) => InboundFrame::Malformed(e.to_string()),
    }
}

/// Outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEnvelope {
    pub event: String,
    pub data: Value,
}

impl ServerEnvelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn welcome(connection_id: &str) -> Self {
        Self::new(
            "welcome",
            json!({
                "message": "Welcome to the venuecast realtime server!",
                "connection_id": connection_id,
            }),
        )
    }

    pub fn echo(received: &Value) -> Self {
        Self::new(
            "message",
            json!({ "message": format!("Server received: {received}") }),
        )
    }

    pub fn joined(room: &str) -> Self {
        Self::new("joined", json!({ "room": room }))
    }

    pub fn left(room: &str) -> Self {
        Self::new("left", json!({ "room": room }))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", json!({ "message": message.into() }))
    }

    pub fn to_json(&self) -> String {
        json!({ "event": self.event, "data": self.data }).to_string()
    }
}
