//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `GameEvent` を JSON にエンコードして送信（push_to, broadcast）
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）が行い、
//! この実装は受け取った sender でメッセージを送るだけです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{GameEvent, MessagePushError, MessagePusher, PlayerId, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャネル
    clients: Mutex<HashMap<PlayerId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// イベントを 1 度だけ JSON にエンコード
fn encode(event: &GameEvent) -> Result<String, MessagePushError> {
    serde_json::to_string(&ServerEvent::from(event))
        .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", player_id);
        clients.insert(player_id, sender);
    }

    async fn unregister_client(&self, player_id: &PlayerId) {
        let mut clients = self.clients.lock().await;
        clients.remove(player_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", player_id);
    }

    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        match clients.get(player_id) {
            Some(sender) => {
                sender
                    .send(content)
                    .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
                tracing::debug!("Pushed message to client '{}'", player_id);
                Ok(())
            }
            None => Err(MessagePushError::ClientNotFound(player_id.to_string())),
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        if targets.is_empty() {
            return Ok(());
        }
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の push_to / broadcast
    // - 閉じたチャネルや未登録クライアントがあっても broadcast が続くこと
    //
    // 【なぜこのテストが必要か】
    // - 切断直後のクライアントへの送信失敗で、他のプレイヤーへの通知が止まってはいけない
    // ========================================

    fn pid(value: &str) -> PlayerId {
        PlayerId::new(value.to_string()).unwrap()
    }

    fn timer_update(time_left: u32) -> GameEvent {
        GameEvent::TimerUpdate { time_left }
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにエンコード済みのイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(pid("gwen"), tx).await;

        // when (操作):
        let result = pusher.push_to(&pid("gwen"), &timer_update(42)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(json, serde_json::json!({"type": "timer_update", "timeLeft": 42}));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&pid("nobody"), &timer_update(1)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_and_missing_clients() {
        // テスト項目: 閉じたチャネルや未登録のクライアントがいても残りには届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (gwen_tx, mut gwen_rx) = mpsc::unbounded_channel();
        let (miles_tx, miles_rx) = mpsc::unbounded_channel();
        pusher.register_client(pid("gwen"), gwen_tx).await;
        pusher.register_client(pid("miles"), miles_tx).await;
        drop(miles_rx);

        // when (操作):
        let targets = vec![pid("miles"), pid("peter"), pid("gwen")];
        let result = pusher.broadcast(targets, &timer_update(7)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(gwen_rx.recv().await.unwrap().contains("\"timeLeft\":7"));
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除したクライアントには送信できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(pid("gwen"), tx).await;

        // when (操作):
        pusher.unregister_client(&pid("gwen")).await;

        // then (期待する結果):
        assert_eq!(pusher.client_count().await, 0);
        assert!(pusher.push_to(&pid("gwen"), &timer_update(1)).await.is_err());
    }
}
