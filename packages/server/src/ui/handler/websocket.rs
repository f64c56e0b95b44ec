//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{GameError, PlayerId},
    infrastructure::dto::websocket::ClientCommand,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards encoded events from the engine to the WebSocket sink.
///
/// The task ends when the engine drops the sender (on disconnect) or the socket closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // 接続ごとにサーバーが ID を払い出す
    let player_id = PlayerId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if !state.engine.connect(player_id.clone(), tx) {
        tracing::error!("Game engine is not running, dropping connection");
        return;
    }

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let engine = state.engine.clone();
    let recv_player_id = player_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error from '{}': {}", recv_player_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match ClientCommand::parse(text.as_str()) {
                    Ok(command) => {
                        engine.command(recv_player_id.clone(), command.into());
                    }
                    Err(error) => {
                        tracing::debug!("Invalid frame from '{}': {}", recv_player_id, text);
                        engine.invalid(recv_player_id.clone(), error);
                    }
                },
                Message::Binary(_) => {
                    engine.invalid(recv_player_id.clone(), GameError::InvalidMessageFormat);
                }
                Message::Close(_) => {
                    tracing::debug!("Client '{}' requested close", recv_player_id);
                    break;
                }
                // Ping/pong is handled by axum
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 切断もイベントとして積むので、先に送られたコマンドは処理される
    state.engine.disconnect(player_id);
}
