//! UseCase: ルームの参照（HTTP API 用）
//!
//! 参照は Repository のスナップショットを読むだけで、エンジンを経由しません。

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Message, Room, RoomId, RoomRepository, Timestamp};

/// メッセージ履歴を 1 度に返す既定の件数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// メッセージ履歴を 1 度に返す上限
pub const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomQueryError {
    #[error("room not found")]
    RoomNotFound,
}

/// ルーム参照のユースケース
pub struct RoomQueryUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl RoomQueryUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 稼働中のルーム一覧
    pub async fn list_rooms(&self) -> Vec<Room> {
        self.repository.list().await
    }

    pub async fn room_detail(&self, room_id: &str) -> Result<Room, RoomQueryError> {
        let room_id = RoomId::new(room_id.to_string()).map_err(|_| RoomQueryError::RoomNotFound)?;
        self.repository
            .find_by_id(&room_id)
            .await
            .ok_or(RoomQueryError::RoomNotFound)
    }

    /// `since` より後のメッセージ（省略時は直近のメッセージ）
    pub async fn messages(
        &self,
        room_id: &str,
        since: Option<Timestamp>,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, RoomQueryError> {
        let room = self.room_detail(room_id).await?;
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        Ok(room.messages_since(since, limit))
    }
}
