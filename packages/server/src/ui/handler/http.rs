//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use sketchpad_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::Timestamp,
    infrastructure::dto::{
        http::{HealthDto, MessagesDto, MessagesQuery, RoomDetailDto, RoomSummaryDto},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
    usecase::RoomQueryError,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy",
        timestamp: timestamp_to_rfc3339(state.clock.now_millis()),
    })
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.room_query_usecase.list_rooms().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.room_query_usecase.room_detail(&room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(RoomQueryError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Get messages of a room, optionally only those after `since`
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesDto>, StatusCode> {
    let since = query.since.map(Timestamp::new);
    match state
        .room_query_usecase
        .messages(&room_id, since, query.limit)
        .await
    {
        Ok(messages) => Ok(Json(MessagesDto {
            room_id,
            messages: messages.iter().map(ChatMessageDto::from).collect(),
        })),
        Err(RoomQueryError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
