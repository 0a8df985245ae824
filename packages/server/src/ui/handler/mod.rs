//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    broadcast_to_all, broadcast_to_room, get_connections, get_room_detail, get_rooms,
    health_check, issue_session, revoke_session,
};
pub use websocket::websocket_handler;
