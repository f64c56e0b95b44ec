//! 接続レジストリ
//!
//! 接続ごとに払い出したプレイヤー ID と、その接続が今いるルームを結び付けます。
//! エンジンタスクだけが所有するため、ロックは持ちません。

use std::collections::HashMap;

use super::value_object::{PlayerId, RoomId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub player_id: PlayerId,
    pub room_id: Option<RoomId>,
    pub connected_at: Timestamp,
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<PlayerId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい接続を登録（同じ ID が既にあれば上書きしない）
    pub fn open(&mut self, player_id: PlayerId, connected_at: Timestamp) -> bool {
        if self.connections.contains_key(&player_id) {
            return false;
        }
        self.connections.insert(
            player_id.clone(),
            Connection {
                player_id,
                room_id: None,
                connected_at,
            },
        );
        true
    }

    /// 接続を破棄し、最後に所属していたルームを返す
    pub fn close(&mut self, player_id: &PlayerId) -> Option<Connection> {
        self.connections.remove(player_id)
    }

    pub fn is_open(&self, player_id: &PlayerId) -> bool {
        self.connections.contains_key(player_id)
    }

    pub fn room_of(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.connections
            .get(player_id)
            .and_then(|c| c.room_id.as_ref())
    }

    /// 接続をルームに結び付ける。未登録の接続なら false。
    pub fn bind(&mut self, player_id: &PlayerId, room_id: RoomId) -> bool {
        match self.connections.get_mut(player_id) {
            Some(connection) => {
                connection.room_id = Some(room_id);
                true
            }
            None => false,
        }
    }

    pub fn unbind(&mut self, player_id: &PlayerId) -> Option<RoomId> {
        self.connections
            .get_mut(player_id)
            .and_then(|c| c.room_id.take())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
