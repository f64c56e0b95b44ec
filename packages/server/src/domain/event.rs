//! サーバーからクライアントへ通知するゲームイベント
//!
//! UseCase 層はこのイベントを `MessagePusher` に渡すだけで、
//! ワイヤーフォーマット（JSON）への変換は Infrastructure 層の DTO が担当します。

use crate::domain::{
    entity::{DrawingStroke, Message, Player, Room, RoundEndReason},
    value_object::PlayerId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// 接続直後に送る挨拶
    Connected { player_id: PlayerId },
    RoomCreated { room: Room },
    /// 参加した本人に送るルームの全体像（直近のメッセージと描画の再生用ストローク付き）
    RoomJoined {
        room: Room,
        messages: Vec<Message>,
        strokes: Vec<DrawingStroke>,
    },
    PlayerJoined {
        player: Player,
        room: Room,
        messages: Vec<Message>,
    },
    PlayerRejoined {
        player: Player,
        messages: Vec<Message>,
    },
    PlayerLeft {
        player_id: PlayerId,
        player_name: String,
        room: Room,
        messages: Vec<Message>,
    },
    GameStarted {
        room: Room,
        messages: Vec<Message>,
    },
    /// 描き手にだけ `word` が入る。他のプレイヤーにはヒントのみ。
    WordSelected {
        word: Option<String>,
        word_hint: String,
        room: Room,
        messages: Vec<Message>,
    },
    NewMessage { message: Message },
    CorrectGuess {
        guesser: Player,
        word: String,
        score: u32,
        room: Room,
        messages: Vec<Message>,
    },
    TimerUpdate { time_left: u32 },
    RoundEnded {
        reason: RoundEndReason,
        word: Option<String>,
        room: Room,
        messages: Vec<Message>,
    },
    NextRound {
        room: Room,
        messages: Vec<Message>,
    },
    GameEnded {
        room: Room,
        messages: Vec<Message>,
    },
    RoomSettingsUpdated { room: Room },
    DrawingUpdate { stroke: DrawingStroke },
    Error { message: String },
}

impl GameEvent {
    /// エラー通知を作成
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
