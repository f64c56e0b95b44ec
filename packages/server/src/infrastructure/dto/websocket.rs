//! WebSocket message DTOs.
//!
//! Every frame is a JSON object with a `type` discriminator and camelCase fields.

use serde::{Deserialize, Serialize};

use crate::domain::GameError;

/// Author id used for messages generated by the server.
pub const SYSTEM_AUTHOR_ID: &str = "system";

/// Command tags the server understands.
const KNOWN_COMMANDS: &[&str] = &[
    "create_room",
    "join_room",
    "start_game",
    "send_message",
    "send_guess",
    "drawing_data",
    "select_word",
    "update_room_settings",
    "clear_canvas",
];

// ========================================
// Client → Server
// ========================================

/// Commands sent by clients.
///
/// Extra fields (a client-side `roomId`, for example) are ignored:
/// the room is always taken from the connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    CreateRoom {
        player_name: String,
        #[serde(default)]
        max_rounds: Option<u32>,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    StartGame,
    SendMessage {
        content: String,
        #[serde(default)]
        message_type: Option<ClientMessageType>,
    },
    SendGuess {
        guess: String,
    },
    DrawingData {
        drawing_type: DrawingType,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        brush_size: Option<f64>,
        #[serde(default)]
        tool: Option<String>,
    },
    SelectWord {
        word: String,
    },
    UpdateRoomSettings {
        #[serde(default)]
        max_rounds: Option<u32>,
    },
    ClearCanvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMessageType {
    Chat,
    Guess,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingType {
    Start,
    Draw,
    End,
    Clear,
}

impl ClientCommand {
    /// Parses a text frame.
    ///
    /// Malformed JSON or a known command with bad fields yields
    /// `InvalidMessageFormat`; a well-formed object with an unknown `type`
    /// yields `UnknownCommand`.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| GameError::InvalidMessageFormat)?;

        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(GameError::InvalidMessageFormat)?
            .to_owned();
        if !KNOWN_COMMANDS.contains(&tag.as_str()) {
            return Err(GameError::UnknownCommand);
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::debug!("Rejected '{}' command: {}", tag, e);
            GameError::InvalidMessageFormat
        })
    }
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub is_host: bool,
    pub is_current_drawer: bool,
    pub has_guessed: bool,
    pub joined_at: i64,
}

/// Public view of a room. The current word is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub code: String,
    pub host_id: String,
    pub host_name: String,
    pub max_rounds: u32,
    pub current_round: u32,
    pub game_state: GameStateDto,
    pub word_hint: Option<String>,
    pub time_left: u32,
    pub is_drawing: bool,
    pub current_drawer_id: Option<String>,
    pub players: Vec<PlayerDto>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStateDto {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTypeDto {
    Chat,
    Guess,
    CorrectGuess,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub player_id: String,
    pub player_name: String,
    pub message: String,
    pub message_type: MessageTypeDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingDataDto {
    pub player_id: String,
    pub drawing_type: DrawingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brush_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReasonDto {
    Timeout,
    WordGuessed,
    Manual,
}

/// Events pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Connected {
        player_id: String,
        message: String,
    },
    RoomCreated {
        room_id: String,
        room_code: String,
        room: RoomDto,
    },
    RoomJoined {
        room_id: String,
        room_code: String,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
        drawing_history: Vec<DrawingDataDto>,
    },
    PlayerJoined {
        player: PlayerDto,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    PlayerRejoined {
        player: PlayerDto,
        messages: Vec<ChatMessageDto>,
    },
    PlayerLeft {
        player_id: String,
        player_name: String,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    GameStarted {
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    WordSelected {
        #[serde(skip_serializing_if = "Option::is_none")]
        word: Option<String>,
        word_hint: String,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    NewMessage {
        message: ChatMessageDto,
    },
    CorrectGuess {
        guesser: String,
        guesser_id: String,
        word: String,
        score: u32,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    TimerUpdate {
        time_left: u32,
    },
    RoundEnded {
        reason: RoundEndReasonDto,
        word: Option<String>,
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    NextRound {
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    GameEnded {
        room: RoomDto,
        messages: Vec<ChatMessageDto>,
    },
    RoomSettingsUpdated {
        room: RoomDto,
    },
    DrawingUpdate {
        drawing_data: DrawingDataDto,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_room_with_optional_rounds() {
        // テスト項目: create_room の maxRounds は省略できる
        // given (前提条件):
        let with_rounds = r#"{"type":"create_room","playerName":"Gwen","maxRounds":3}"#;
        let without_rounds = r#"{"type":"create_room","playerName":"Gwen"}"#;

        // when (操作):
        let with_rounds = ClientCommand::parse(with_rounds);
        let without_rounds = ClientCommand::parse(without_rounds);

        // then (期待する結果):
        assert_eq!(
            with_rounds,
            Ok(ClientCommand::CreateRoom {
                player_name: "Gwen".to_string(),
                max_rounds: Some(3),
            })
        );
        assert_eq!(
            without_rounds,
            Ok(ClientCommand::CreateRoom {
                player_name: "Gwen".to_string(),
                max_rounds: None,
            })
        );
    }

    #[test]
    fn test_parse_ignores_client_room_id() {
        // テスト項目: クライアントが送る roomId などの余分なフィールドは無視される
        // given (前提条件):
        let text = r#"{"type":"send_guess","roomId":"whatever","guess":"venom"}"#;

        // when (操作):
        let command = ClientCommand::parse(text);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(ClientCommand::SendGuess {
                guess: "venom".to_string()
            })
        );
    }

    #[test]
    fn test_parse_commands_without_fields() {
        // テスト項目: フィールドを持たないコマンドも解析できる
        // given (前提条件):
        let start = r#"{"type":"start_game","roomId":"abc"}"#;
        let clear = r#"{"type":"clear_canvas"}"#;

        // when (操作) / then (期待する結果):
        assert_eq!(ClientCommand::parse(start), Ok(ClientCommand::StartGame));
        assert_eq!(ClientCommand::parse(clear), Ok(ClientCommand::ClearCanvas));
    }

    #[test]
    fn test_parse_drawing_data() {
        // テスト項目: drawing_data の描画種別と座標を解析できる
        // given (前提条件):
        let text = r##"{"type":"drawing_data","drawingType":"draw","x":10.5,"y":3,"color":"#ff0000","brushSize":4,"tool":"pen"}"##;

        // when (操作):
        let command = ClientCommand::parse(text).unwrap();

        // then (期待する結果):
        match command {
            ClientCommand::DrawingData {
                drawing_type,
                x,
                y,
                color,
                brush_size,
                tool,
            } => {
                assert_eq!(drawing_type, DrawingType::Draw);
                assert_eq!(x, Some(10.5));
                assert_eq!(y, Some(3.0));
                assert_eq!(color.as_deref(), Some("#ff0000"));
                assert_eq!(brush_size, Some(4.0));
                assert_eq!(tool.as_deref(), Some("pen"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        // テスト項目: 不正な JSON・未知のコマンド・フィールド不足をそれぞれ区別する
        // given (前提条件):
        let cases = [
            ("not json", GameError::InvalidMessageFormat),
            (r#"{"content":"no type"}"#, GameError::InvalidMessageFormat),
            (r#"{"type":"dance"}"#, GameError::UnknownCommand),
            (r#"{"type":"send_guess"}"#, GameError::InvalidMessageFormat),
            (
                r#"{"type":"drawing_data","drawingType":"erase"}"#,
                GameError::InvalidMessageFormat,
            ),
        ];

        // when (操作) / then (期待する結果):
        for (text, expected) in cases {
            assert_eq!(ClientCommand::parse(text), Err(expected), "input: {text}");
        }
    }

    #[test]
    fn test_parse_same_frames_in_sequence() {
        // テスト項目: 未知のタグ、フィールド不正、正しいコマンドを続けて解析しても結果が混ざらない
        // given (前提条件):
        let unknown = r#"{"type":"select_colour","colour":"red"}"#;
        let bad_fields = r#"{"type":"join_room","roomCode":42}"#;
        let valid = r#"{"type":"select_word","word":"apple"}"#;

        // when (操作):
        let unknown = ClientCommand::parse(unknown);
        let bad_fields = ClientCommand::parse(bad_fields);
        let valid = ClientCommand::parse(valid);

        // then (期待する結果):
        assert_eq!(unknown, Err(GameError::UnknownCommand));
        assert_eq!(bad_fields, Err(GameError::InvalidMessageFormat));
        assert_eq!(
            valid,
            Ok(ClientCommand::SelectWord {
                word: "apple".to_string()
            })
        );
    }

    #[test]
    fn test_server_event_uses_type_tag_and_camel_case() {
        // テスト項目: サーバーイベントは type タグと camelCase のフィールドで出力される
        // given (前提条件):
        let event = ServerEvent::TimerUpdate { time_left: 42 };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json, serde_json::json!({"type": "timer_update", "timeLeft": 42}));
    }

    #[test]
    fn test_word_selected_omits_word_for_guessers() {
        // テスト項目: お題が None の word_selected には word フィールドが含まれない
        // given (前提条件):
        let room = RoomDto {
            id: "room-1".to_string(),
            code: "ABC123".to_string(),
            host_id: "gwen".to_string(),
            host_name: "Gwen".to_string(),
            max_rounds: 3,
            current_round: 1,
            game_state: GameStateDto::Playing,
            word_hint: Some("_ _ _ _ _".to_string()),
            time_left: 120,
            is_drawing: true,
            current_drawer_id: Some("gwen".to_string()),
            players: vec![],
            created_at: 0,
        };
        let event = ServerEvent::WordSelected {
            word: None,
            word_hint: "_ _ _ _ _".to_string(),
            room,
            messages: vec![],
        };

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "word_selected");
        assert_eq!(json["wordHint"], "_ _ _ _ _");
        assert!(json.get("word").is_none());
        assert!(json["room"].get("currentWord").is_none());
        assert_eq!(json["room"]["gameState"], "playing");
    }
}
