//! InMemory Hub Repository 実装
//!
//! ドメイン層が定義する HubRepository trait の具体的な実装。
//! `Hub` 集約を 1 つの Mutex で保護し、全ての状態変更をロック内で同期的に完了させます。
//! ロック中に I/O を待つことはないため、変更は単一スレッドで順番に実行されるのと同じ結果になります。

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionMetadata, DisplayName, Hub, HubRepository, Identity,
    RepositoryError, Room, RoomId, Timestamp,
};

/// インメモリ Hub Repository 実装
pub struct InMemoryHubRepository {
    hub: Arc<Mutex<Hub>>,
}

impl InMemoryHubRepository {
    /// 新しい InMemoryHubRepository を作成
    pub fn new(hub: Arc<Mutex<Hub>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl HubRepository for InMemoryHubRepository {
    async fn register(
        &self,
        identity: Identity,
        metadata: ConnectionMetadata,
        connected_at: Timestamp,
    ) -> ConnectionId {
        let mut hub = self.hub.lock().await;
        hub.register(identity, metadata, connected_at)
    }

    async fn lookup(&self, id: &ConnectionId) -> Option<Connection> {
        let hub = self.hub.lock().await;
        hub.lookup(id).cloned()
    }

    async fn unregister(&self, id: &ConnectionId) -> Option<Connection> {
        let mut hub = self.hub.lock().await;
        hub.unregister(id)
    }

    async fn update_identity(
        &self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(), RepositoryError> {
        let mut hub = self.hub.lock().await;
        hub.update_identity(id, name)
    }

    async fn join(&self, id: &ConnectionId, room_id: RoomId) -> Result<bool, RepositoryError> {
        let mut hub = self.hub.lock().await;
        hub.join(id, room_id)
    }

    async fn leave(&self, id: &ConnectionId, room_id: &RoomId) -> Result<bool, RepositoryError> {
        let mut hub = self.hub.lock().await;
        hub.leave(id, room_id)
    }

    async fn leave_all(&self, id: &ConnectionId) -> Vec<RoomId> {
        let mut hub = self.hub.lock().await;
        hub.leave_all(id)
    }

    async fn members_of(&self, room_id: &RoomId) -> BTreeSet<ConnectionId> {
        let hub = self.hub.lock().await;
        hub.members_of(room_id)
    }

    async fn all_connection_ids(&self) -> Vec<ConnectionId> {
        let hub = self.hub.lock().await;
        hub.connection_ids()
    }

    async fn list_connections(&self) -> Vec<Connection> {
        let hub = self.hub.lock().await;
        let mut connections: Vec<Connection> = hub.connections().cloned().collect();
        connections.sort_by_key(|c| (c.connected_at, c.id.clone()));
        connections
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let hub = self.hub.lock().await;
        let mut rooms: Vec<Room> = hub.rooms().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let hub = self.hub.lock().await;
        hub.room(room_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryHubRepository が Hub の操作をロック内で正しく委譲すること
    // - 並行して join / leave_all / unregister が走っても整合性が崩れないこと
    //
    // 【なぜこのテストが必要か】
    // - UseCase 層はこの Repository を通してのみ状態を変更する
    // - 複数の接続タスクから同時に呼ばれるため、直列化が保証されている必要がある
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn create_test_repository() -> (InMemoryHubRepository, Arc<Mutex<Hub>>) {
        let hub = Arc::new(Mutex::new(Hub::with_durable_rooms([room("hall-1")])));
        (InMemoryHubRepository::new(hub.clone()), hub)
    }

    async fn register(repo: &InMemoryHubRepository, identity: &str) -> ConnectionId {
        repo.register(
            Identity::new(identity.to_string()).unwrap(),
            ConnectionMetadata::default(),
            Timestamp::new(0),
        )
        .await
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        // テスト項目: 登録した接続を取得できる
        // given (前提条件):
        let (repo, _hub) = create_test_repository();

        // when (操作):
        let id = register(&repo, "alice").await;
        let found = repo.lookup(&id).await;

        // then (期待する結果):
        assert_eq!(found.map(|c| c.identity.into_string()), Some("alice".to_string()));
        assert_eq!(repo.all_connection_ids().await, vec![id]);
    }

    #[tokio::test]
    async fn test_join_and_members_of() {
        // テスト項目: join したメンバーが members_of に含まれる
        // given (前提条件):
        let (repo, _hub) = create_test_repository();
        let alice = register(&repo, "alice").await;
        let bob = register(&repo, "bob").await;

        // when (操作):
        repo.join(&alice, room("hall-1")).await.unwrap();
        repo.join(&bob, room("hall-1")).await.unwrap();

        // then (期待する結果):
        let members = repo.members_of(&room("hall-1")).await;
        assert_eq!(members, BTreeSet::from([alice, bob]));
    }

    #[tokio::test]
    async fn test_list_rooms_includes_empty_durable_room() {
        // テスト項目: 空の永続ルームも一覧に含まれる
        // given (前提条件):
        let (repo, _hub) = create_test_repository();

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, room("hall-1"));
        assert!(rooms[0].durable);
    }

    #[tokio::test]
    async fn test_concurrent_operations_keep_state_consistent() {
        // テスト項目: 複数タスクから同時に操作しても双方向の整合性が保たれる
        // given (前提条件):
        let (repo, hub) = create_test_repository();
        let repo = Arc::new(repo);

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let id = register(&repo, &format!("user-{i}")).await;
                repo.join(&id, room("hall-1")).await.unwrap();
                repo.join(&id, room(&format!("booth-{}", i % 3))).await.unwrap();
                if i % 2 == 0 {
                    repo.leave_all(&id).await;
                    repo.unregister(&id).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let hub = hub.lock().await;
        assert!(hub.is_consistent());
        assert_eq!(hub.connection_ids().len(), 8);
        assert_eq!(hub.members_of(&room("hall-1")).len(), 8);
    }
}
