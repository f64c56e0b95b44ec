//! 接続からエンジンへ渡されるコマンド
//!
//! ワイヤーフォーマットから切り離した、検証前の入力です。
//! 値の検証（名前・参加コード・お題など）はエンジン側で行います。

use crate::domain::{MessageKind, StrokeKind};

/// 描画コマンドの中身（作者と時刻はエンジンが付与する）
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeInput {
    pub kind: StrokeKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<String>,
    pub brush_size: Option<f64>,
    pub tool: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateRoom {
        player_name: String,
        max_rounds: Option<u32>,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    StartGame,
    SendMessage {
        content: String,
        kind: MessageKind,
    },
    SendGuess {
        guess: String,
    },
    Draw(StrokeInput),
    SelectWord {
        word: String,
    },
    UpdateSettings {
        max_rounds: Option<u32>,
    },
    ClearCanvas,
}

impl Command {
    /// ログ用のコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateRoom { .. } => "create_room",
            Command::JoinRoom { .. } => "join_room",
            Command::StartGame => "start_game",
            Command::SendMessage { .. } => "send_message",
            Command::SendGuess { .. } => "send_guess",
            Command::Draw(_) => "drawing_data",
            Command::SelectWord { .. } => "select_word",
            Command::UpdateSettings { .. } => "update_room_settings",
            Command::ClearCanvas => "clear_canvas",
        }
    }
}
