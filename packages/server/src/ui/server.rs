//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use sketchpad_shared::time::Clock;
use tokio::{net::TcpListener, sync::mpsc};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{GameConfig, MessagePusher, RoomRepository},
    infrastructure::round_timer::TokioRoundTimer,
    usecase::{CommandDispatcher, Engine, GameSession, RoomQueryUseCase},
};

use super::{
    handler::{get_room_detail, get_room_messages, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Sketchpad game server
///
/// Owns the adapters the game engine is wired with. The engine itself is
/// created when the server starts serving.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(repository, message_pusher, clock, GameConfig::default());
/// server.run("127.0.0.1".to_string(), 8004).await?;
/// ```
pub struct Server {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    config: GameConfig,
}

impl Server {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: GameConfig,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            config,
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Sketchpad server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Wire the engine in order:
        // 1. RoundTimer (ticks flow back into the engine)
        // 2. GameSession
        // 3. CommandDispatcher
        // 4. Engine
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let round_timer = Box::new(TokioRoundTimer::new(tick_tx));
        let session = GameSession::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            round_timer,
            self.clock.clone(),
            self.config,
        );
        let dispatcher = CommandDispatcher::new(session, self.message_pusher, self.clock.clone());
        let (engine, engine_handle) = Engine::new(dispatcher, tick_rx);
        let engine_task = tokio::spawn(engine.run());

        let app_state = Arc::new(AppState {
            engine: engine_handle,
            room_query_usecase: Arc::new(RoomQueryUseCase::new(self.repository)),
            clock: self.clock,
        });

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/api/rooms/{room_id}/messages", get(get_room_messages))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        engine_task.abort();
        tracing::info!("Server shutdown complete");

        result.map_err(Into::into)
    }
}
