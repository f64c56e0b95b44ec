//! MessagePusher trait 定義
//!
//! クライアントへの通知（push / broadcast）の抽象化。
//! UseCase 層はこの trait に依存し、WebSocket などの通信手段には依存しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::GameEvent, value_object::PlayerId};

/// クライアントごとの送信チャネル（エンコード済み JSON を流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 送信はベストエフォート。閉じたチャネルはログに残してスキップする。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャネルを登録
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    async fn unregister_client(&self, player_id: &PlayerId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(&self, player_id: &PlayerId, event: &GameEvent)
    -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        event: &GameEvent,
    ) -> Result<(), MessagePushError>;
}
