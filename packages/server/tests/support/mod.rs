//! Test harness: an in-process server on an ephemeral port plus a thin WebSocket client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use sketchpad_server::{
    domain::GameConfig,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
};
use sketchpad_shared::time::SystemClock;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// How long a test waits for a single event before failing.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Server bound to `127.0.0.1:0`, stopped when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(GameConfig::default()).await
    }

    pub async fn start_with(config: GameConfig) -> Self {
        // Bind to an ephemeral port to avoid collisions between tests
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");

        let server = Server::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
            config,
        );
        let task = tokio::spawn(async move {
            server
                .serve(listener, std::future::pending())
                .await
                .expect("server failed");
        });

        Self { addr, task }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = reqwest::get(self.http_url(path))
            .await
            .expect("http request");
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// WebSocket client that speaks the JSON protocol.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub player_id: String,
}

impl TestClient {
    /// Connect and consume the `connected` greeting.
    pub async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url())
            .await
            .expect("websocket handshake");
        let mut client = Self {
            ws,
            player_id: String::new(),
        };
        let connected = client.expect_event("connected").await;
        client.player_id = connected["playerId"]
            .as_str()
            .expect("playerId in connected event")
            .to_string();
        client
    }

    pub async fn send(&mut self, frame: Value) {
        self.send_raw(&frame.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::text(text.to_string()))
            .await
            .expect("send frame");
    }

    /// Next event other than `timer_update`.
    pub async fn next_event(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(EVENT_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for an event")
                .expect("connection closed")
                .expect("websocket error");
            let Message::Text(text) = frame else {
                continue;
            };
            let event: Value = serde_json::from_str(text.as_str()).expect("event is JSON");
            if event["type"] != "timer_update" {
                return event;
            }
        }
    }

    /// Next event, asserting its type.
    pub async fn expect_event(&mut self, event_type: &str) -> Value {
        let event = self.next_event().await;
        assert_eq!(event["type"], event_type, "unexpected event: {}", event);
        event
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Host creates a room and a second player joins it. Returns the join code.
pub async fn room_with_two_players(host: &mut TestClient, guest: &mut TestClient) -> String {
    host.send(serde_json::json!({"type": "create_room", "playerName": "Gwen"}))
        .await;
    let created = host.expect_event("room_created").await;
    let code = created["roomCode"].as_str().expect("roomCode").to_string();

    guest
        .send(serde_json::json!({"type": "join_room", "roomCode": code, "playerName": "Miles"}))
        .await;
    guest.expect_event("room_joined").await;
    host.expect_event("player_joined").await;
    code
}
