//! UseCase: ルームへの参加・退出
//!
//! どちらの操作も冪等です。既に参加しているルームへの join、参加していない
//! ルームからの leave はエラーになりません。

use std::sync::Arc;

use crate::domain::{ConnectionId, HubRepository, RoomId};

use super::error::MembershipError;

pub struct RoomMembershipUseCase {
    repository: Arc<dyn HubRepository>,
}

impl RoomMembershipUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    /// ルームに参加する（ルームが無ければ作成される）
    pub async fn join(
        &self,
        client_id: &ConnectionId,
        room: String,
    ) -> Result<RoomId, MembershipError> {
        let room_id =
            RoomId::new(room).map_err(|e| MembershipError::InvalidRoom(e.to_string()))?;

        let added = self.repository.join(client_id, room_id.clone()).await?;
        if added {
            tracing::info!("Connection '{}' joined room '{}'", client_id, room_id);
        } else {
            tracing::debug!("Connection '{}' is already in room '{}'", client_id, room_id);
        }
        Ok(room_id)
    }

    /// ルームから退出する
    pub async fn leave(
        &self,
        client_id: &ConnectionId,
        room: String,
    ) -> Result<RoomId, MembershipError> {
        let room_id =
            RoomId::new(room).map_err(|e| MembershipError::InvalidRoom(e.to_string()))?;

        if self.repository.leave(client_id, &room_id).await? {
            tracing::info!("Connection '{}' left room '{}'", client_id, room_id);
        }
        Ok(room_id)
    }
}
