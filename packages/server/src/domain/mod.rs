//! Domain layer: value objects, entities, the in-memory aggregate that keeps
//! the connection registry and room membership consistent, and the traits the
//! outer layers implement.

pub mod entity;
pub mod error;
pub mod hub;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod room_manager;
pub mod session;
pub mod value_object;

pub use entity::{
    BroadcastEvent, BroadcastTarget, Connection, ConnectionMetadata, DeliveryOutcome,
    DeliveryReport, Room,
};
pub use error::{MessagePushError, RepositoryError, SessionError, ValidationError};
pub use hub::Hub;
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use registry::ConnectionRegistry;
pub use repository::HubRepository;
pub use room_manager::RoomManager;
pub use session::{Session, SessionStore};
pub use value_object::{
    ConnectionId, DisplayName, EventName, Identity, RoomId, SessionToken, Timestamp,
};
