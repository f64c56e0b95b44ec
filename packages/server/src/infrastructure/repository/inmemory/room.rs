//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、参加コードの索引を別に持ちます。
//!
//! プロセスの再起動でルームは失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    JoinCode, Player, RepositoryError, Room, RoomId, RoomRepository, Timestamp,
};

/// 参加コードの払い出しを諦めるまでの試行回数
const MAX_JOIN_CODE_ATTEMPTS: usize = 64;

#[derive(Default)]
struct Store {
    rooms: HashMap<RoomId, Room>,
    codes: HashMap<JoinCode, RoomId>,
    /// 作成順
    order: Vec<RoomId>,
}

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    store: Mutex<Store>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        host: Player,
        max_rounds: u32,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let mut store = self.store.lock().await;

        let join_code = (0..MAX_JOIN_CODE_ATTEMPTS)
            .map(|_| JoinCode::generate())
            .find(|code| !store.codes.contains_key(code))
            .ok_or(RepositoryError::JoinCodeExhausted(MAX_JOIN_CODE_ATTEMPTS))?;

        let room = Room::new(RoomId::generate(), join_code, host, max_rounds, created_at)
            .map_err(|e| RepositoryError::InvalidRoom(e.to_string()))?;

        store
            .codes
            .insert(room.join_code.clone(), room.id.clone());
        store.order.push(room.id.clone());
        store.rooms.insert(room.id.clone(), room.clone());
        tracing::debug!("Room '{}' created with code {}", room.id, room.join_code);

        Ok(room)
    }

    async fn find_by_id(&self, room_id: &RoomId) -> Option<Room> {
        let store = self.store.lock().await;
        store.rooms.get(room_id).cloned()
    }

    async fn find_by_code(&self, join_code: &JoinCode) -> Option<Room> {
        let store = self.store.lock().await;
        store
            .codes
            .get(join_code)
            .and_then(|room_id| store.rooms.get(room_id))
            .cloned()
    }

    async fn save(&self, room: Room) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        match store.rooms.get_mut(&room.id) {
            Some(stored) => {
                *stored = room;
                Ok(())
            }
            None => Err(RepositoryError::RoomNotFound(room.id.to_string())),
        }
    }

    async fn delete(&self, room_id: &RoomId) {
        let mut store = self.store.lock().await;
        if let Some(room) = store.rooms.remove(room_id) {
            store.codes.remove(&room.join_code);
            store.order.retain(|id| id != room_id);
            tracing::debug!("Room '{}' ({}) deleted", room.id, room.join_code);
        }
    }

    async fn list(&self) -> Vec<Room> {
        let store = self.store.lock().await;
        store
            .order
            .iter()
            .filter_map(|id| store.rooms.get(id))
            .cloned()
            .collect()
    }
}
