//! Repository trait 定義
//!
//! ドメイン層が必要とする接続レジストリ・ルーム状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回の呼び出しの中で状態変更を完了させます。
//! 実装は呼び出し途中で他の変更が割り込まないことを保証しなければなりません。

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, ConnectionMetadata, DisplayName, Identity, RepositoryError, Room,
    RoomId, Timestamp,
};

/// Connection registry + room membership repository
#[async_trait]
pub trait HubRepository: Send + Sync {
    /// 接続を登録し、新しい ConnectionId を返す（失敗しない）
    async fn register(
        &self,
        identity: Identity,
        metadata: ConnectionMetadata,
        connected_at: Timestamp,
    ) -> ConnectionId;

    /// 接続を取得（存在しなければ None。「既に切断済み」として扱う）
    async fn lookup(&self, id: &ConnectionId) -> Option<Connection>;

    /// 接続を削除（冪等。未登録 ID は何もしない）
    async fn unregister(&self, id: &ConnectionId) -> Option<Connection>;

    /// 表示名を更新
    async fn update_identity(
        &self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RepositoryError>;

    /// ルームに参加（既に参加済みなら Ok(false)）
    async fn join(&self, id: &ConnectionId, room_id: RoomId) -> Result<bool, RepositoryError>;

    /// ルームから退出（参加していなければ Ok(false)）
    async fn leave(&self, id: &ConnectionId, room_id: &RoomId) -> Result<bool, RepositoryError>;

    /// 全てのルームから退出し、退出したルームを返す
    async fn leave_all(&self, id: &ConnectionId) -> Vec<RoomId>;

    /// ルームのメンバーのスナップショット（ルームが無ければ空集合）
    async fn members_of(&self, room_id: &RoomId) -> BTreeSet<ConnectionId>;

    /// 接続中の全ての ConnectionId を取得
    async fn all_connection_ids(&self) -> Vec<ConnectionId>;

    /// 接続中の全ての接続を取得
    async fn list_connections(&self) -> Vec<Connection>;

    /// 全てのルームを取得
    async fn list_rooms(&self) -> Vec<Room>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;
}
