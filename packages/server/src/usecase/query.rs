//! UseCase: 状態の参照（HTTP API 用）
//!
//! いずれも読み取り専用で、Hub の状態を変更しません。

use std::sync::Arc;

use crate::domain::{Connection, HubRepository, Room, RoomId};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn HubRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    /// ルーム ID 順のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn HubRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    /// ルームとそのメンバーの接続情報を返す
    ///
    /// # Returns
    ///
    /// * `Err(GetRoomDetailError::InvalidRoomId)` - ルーム ID の形式が不正
    /// * `Err(GetRoomDetailError::RoomNotFound)` - 該当するルームが存在しない
    pub async fn execute(
        &self,
        room_id: String,
    ) -> Result<(Room, Vec<Connection>), GetRoomDetailError> {
        let room_id = RoomId::new(room_id)
            .map_err(|e| GetRoomDetailError::InvalidRoomId(e.to_string()))?;
        let room = self
            .repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;

        let mut members = Vec::with_capacity(room.members.len());
        for id in &room.members {
            if let Some(connection) = self.repository.lookup(id).await {
                members.push(connection);
            }
        }
        Ok((room, members))
    }
}

/// 接続一覧取得のユースケース
pub struct ListConnectionsUseCase {
    repository: Arc<dyn HubRepository>,
}

impl ListConnectionsUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    /// 接続時刻順の接続一覧
    pub async fn execute(&self) -> Vec<Connection> {
        self.repository.list_connections().await
    }
}
