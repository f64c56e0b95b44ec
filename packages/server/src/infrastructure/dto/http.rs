//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{ChatMessageDto, GameStateDto, RoomDto};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    /// RFC 3339
    pub timestamp: String,
}

/// Room list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub code: String,
    pub game_state: GameStateDto,
    pub player_count: usize,
    pub current_round: u32,
    pub max_rounds: u32,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail with its public state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    #[serde(flatten)]
    pub room: RoomDto,
    pub message_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesDto {
    pub room_id: String,
    pub messages: Vec<ChatMessageDto>,
}

/// Query for incremental message delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagesQuery {
    /// Unix milliseconds; only messages strictly after it are returned.
    pub since: Option<i64>,
    pub limit: Option<usize>,
}
