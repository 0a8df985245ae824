//! UseCase: 表示名のアナウンス
//!
//! 匿名で接続した後に届く `user-connected` を処理します。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, HubRepository};

use super::error::AnnounceError;

pub struct AnnounceIdentityUseCase {
    repository: Arc<dyn HubRepository>,
}

impl AnnounceIdentityUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    /// 表示名を更新する。名前が無い・空白の場合は "Unknown User" に戻す。
    pub async fn execute(
        &self,
        client_id: &ConnectionId,
        name: Option<String>,
    ) -> Result<DisplayName, AnnounceError> {
        let display_name = DisplayName::from_announcement(name);

        self.repository
            .update_identity(client_id, display_name.clone())
            .await?;

        tracing::info!(
            "User \"{}\" connected (ID: {})",
            display_name,
            client_id
        );
        Ok(display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionMetadata, Hub, Identity, Timestamp},
        infrastructure::repository::InMemoryHubRepository,
    };
    use tokio::sync::Mutex;

    async fn create_usecase() -> (AnnounceIdentityUseCase, Arc<InMemoryHubRepository>, ConnectionId) {
        let repository = Arc::new(InMemoryHubRepository::new(Arc::new(Mutex::new(Hub::new()))));
        let id = repository
            .register(
                Identity::new("alice@example.com".to_string()).unwrap(),
                ConnectionMetadata::default(),
                Timestamp::new(0),
            )
            .await;
        (AnnounceIdentityUseCase::new(repository.clone()), repository, id)
    }

    #[tokio::test]
    async fn test_announce_sets_display_name() {
        // テスト項目: アナウンスされた名前が表示名になる
        // given (前提条件):
        let (usecase, repository, id) = create_usecase().await;

        // when (操作):
        let result = usecase.execute(&id, Some("Alice".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(DisplayName::new("Alice".to_string()).unwrap()));
        let connection = repository.lookup(&id).await.unwrap();
        assert_eq!(connection.display_name.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_blank_announcement_falls_back_to_unknown() {
        // テスト項目: 空の名前は "Unknown User" になる
        // given (前提条件):
        let (usecase, _repository, id) = create_usecase().await;
        usecase.execute(&id, Some("Alice".to_string())).await.unwrap();

        // when (操作):
        let result = usecase.execute(&id, Some("".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(DisplayName::unknown()));
    }

    #[tokio::test]
    async fn test_long_name_is_accepted() {
        // テスト項目: 65 文字を超える名前もそのまま表示名になる
        // given (前提条件):
        let (usecase, repository, id) = create_usecase().await;
        let long_name = "x".repeat(65);

        // when (操作):
        let result = usecase.execute(&id, Some(long_name.clone())).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let connection = repository.lookup(&id).await.unwrap();
        assert_eq!(connection.display_name.as_str(), long_name);
    }

    #[tokio::test]
    async fn test_announce_for_unknown_connection() {
        // テスト項目: 未登録の接続からのアナウンスは UnknownConnection
        // given (前提条件):
        let (usecase, _repository, _id) = create_usecase().await;
        let ghost = ConnectionId::generate();

        // when (操作):
        let result = usecase.execute(&ghost, Some("Ghost".to_string())).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(AnnounceError::UnknownConnection(ghost.to_string()))
        );
    }
}
