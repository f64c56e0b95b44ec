//! Shared application state.

use std::sync::Arc;

use sketchpad_shared::time::Clock;

use crate::usecase::{EngineHandle, RoomQueryUseCase};

pub struct AppState {
    /// ゲームエンジンへの入口（全ての WebSocket 接続が共有する）
    pub engine: EngineHandle,
    /// RoomQueryUseCase（ルーム参照のユースケース）
    pub room_query_usecase: Arc<RoomQueryUseCase>,
    pub clock: Arc<dyn Clock>,
}
