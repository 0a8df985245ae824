//! UseCase layer.
//!
//! The connection lifecycle (validate, register, serve, disconnect) is split
//! across `validate_session`, `connect_client` and `disconnect_client`; the
//! broadcast dispatcher lives in `broadcast_event`.

pub mod announce_identity;
pub mod broadcast_event;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod manage_sessions;
pub mod query;
pub mod reply;
pub mod room_membership;
pub mod validate_session;

pub use announce_identity::AnnounceIdentityUseCase;
pub use broadcast_event::BroadcastEventUseCase;
pub use connect_client::{ConnectClientUseCase, RegisteredClient};
pub use disconnect_client::{DisconnectClientUseCase, DisconnectSummary};
pub use error::{
    AnnounceError, BroadcastError, ConnectError, GetRoomDetailError, IssueSessionError,
    MembershipError, RevokeSessionError,
};
pub use manage_sessions::ManageSessionsUseCase;
pub use query::{GetRoomDetailUseCase, GetRoomsUseCase, ListConnectionsUseCase};
pub use reply::ReplyUseCase;
pub use room_membership::RoomMembershipUseCase;
pub use validate_session::{Handshake, SessionValidator};
