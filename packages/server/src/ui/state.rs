//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    AnnounceIdentityUseCase, BroadcastEventUseCase, ConnectClientUseCase,
    DisconnectClientUseCase, GetRoomDetailUseCase, GetRoomsUseCase, ListConnectionsUseCase,
    ManageSessionsUseCase, ReplyUseCase, RoomMembershipUseCase,
};

pub struct AppState {
    /// ConnectClientUseCase（セッション検証と接続登録）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断処理）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// AnnounceIdentityUseCase（表示名の通知）
    pub announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
    /// RoomMembershipUseCase（ルームへの参加・退出）
    pub room_membership_usecase: Arc<RoomMembershipUseCase>,
    /// BroadcastEventUseCase（ブロードキャスト配信）
    pub broadcast_event_usecase: Arc<BroadcastEventUseCase>,
    /// ReplyUseCase（送信元への応答）
    pub reply_usecase: Arc<ReplyUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub list_connections_usecase: Arc<ListConnectionsUseCase>,
    pub manage_sessions_usecase: Arc<ManageSessionsUseCase>,
    /// セッション Cookie 名
    pub session_cookie: String,
}
