//! Dependency wiring.
//!
//! Builds, in order: Hub → Repository → MessagePusher → SessionStore →
//! UseCases → AppState.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use venuecast_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::Hub,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryHubRepository,
        session::InMemorySessionStore,
    },
    ui::state::AppState,
    usecase::{
        AnnounceIdentityUseCase, BroadcastEventUseCase, ConnectClientUseCase,
        DisconnectClientUseCase, GetRoomDetailUseCase, GetRoomsUseCase, ListConnectionsUseCase,
        ManageSessionsUseCase, ReplyUseCase, RoomMembershipUseCase, SessionValidator,
    },
};

pub fn build_app_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<AppState> {
    // 1. Hub (in-memory database) with durable rooms pre-created
    let durable_rooms = config.durable_room_ids();
    for room_id in &durable_rooms {
        tracing::info!("Durable room '{}' created", room_id);
    }
    let hub = Arc::new(Mutex::new(Hub::with_durable_rooms(durable_rooms)));
    let repository = Arc::new(InMemoryHubRepository::new(hub));

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. SessionStore
    let session_store = Arc::new(InMemorySessionStore::new(clock.clone(), config.session_ttl));

    // 4. UseCases
    let validator = SessionValidator::new(session_store.clone(), clock.clone());
    Arc::new(AppState {
        connect_client_usecase: Arc::new(ConnectClientUseCase::new(
            validator,
            repository.clone(),
            message_pusher.clone(),
            clock,
        )),
        disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        announce_identity_usecase: Arc::new(AnnounceIdentityUseCase::new(repository.clone())),
        room_membership_usecase: Arc::new(RoomMembershipUseCase::new(repository.clone())),
        broadcast_event_usecase: Arc::new(BroadcastEventUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        reply_usecase: Arc::new(ReplyUseCase::new(message_pusher)),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository.clone())),
        list_connections_usecase: Arc::new(ListConnectionsUseCase::new(repository)),
        manage_sessions_usecase: Arc::new(ManageSessionsUseCase::new(session_store)),
        session_cookie: config.session_cookie.clone(),
    })
}
