//! Conversion logic between DTOs and domain types.

use sketchpad_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{
        Author, DrawingStroke, GameEvent, GameState, Message, MessageKind, Player, Room,
        RoundEndReason, StrokeKind,
    },
    infrastructure::dto::{http, websocket as dto},
    usecase::{Command, StrokeInput},
};

/// Greeting sent with the `connected` event.
pub const WELCOME_MESSAGE: &str = "Welcome to Sketchpad!";

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientCommand> for Command {
    fn from(command: dto::ClientCommand) -> Self {
        match command {
            dto::ClientCommand::CreateRoom {
                player_name,
                max_rounds,
            } => Command::CreateRoom {
                player_name,
                max_rounds,
            },
            dto::ClientCommand::JoinRoom {
                room_code,
                player_name,
            } => Command::JoinRoom {
                room_code,
                player_name,
            },
            dto::ClientCommand::StartGame => Command::StartGame,
            dto::ClientCommand::SendMessage {
                content,
                message_type,
            } => Command::SendMessage {
                content,
                kind: match message_type {
                    None | Some(dto::ClientMessageType::Chat) => MessageKind::Chat,
                    Some(dto::ClientMessageType::Guess) => MessageKind::Guess,
                    Some(dto::ClientMessageType::System) => MessageKind::System,
                },
            },
            dto::ClientCommand::SendGuess { guess } => Command::SendGuess { guess },
            dto::ClientCommand::DrawingData {
                drawing_type,
                x,
                y,
                color,
                brush_size,
                tool,
            } => Command::Draw(StrokeInput {
                kind: drawing_type.into(),
                x,
                y,
                color,
                brush_size,
                tool,
            }),
            dto::ClientCommand::SelectWord { word } => Command::SelectWord { word },
            dto::ClientCommand::UpdateRoomSettings { max_rounds } => {
                Command::UpdateSettings { max_rounds }
            }
            dto::ClientCommand::ClearCanvas => Command::ClearCanvas,
        }
    }
}

impl From<dto::DrawingType> for StrokeKind {
    fn from(drawing_type: dto::DrawingType) -> Self {
        match drawing_type {
            dto::DrawingType::Start => StrokeKind::Start,
            dto::DrawingType::Draw => StrokeKind::Point,
            dto::DrawingType::End => StrokeKind::End,
            dto::DrawingType::Clear => StrokeKind::Clear,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<StrokeKind> for dto::DrawingType {
    fn from(kind: StrokeKind) -> Self {
        match kind {
            StrokeKind::Start => dto::DrawingType::Start,
            StrokeKind::Point => dto::DrawingType::Draw,
            StrokeKind::End => dto::DrawingType::End,
            StrokeKind::Clear => dto::DrawingType::Clear,
        }
    }
}

impl From<GameState> for dto::GameStateDto {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Waiting => dto::GameStateDto::Waiting,
            GameState::Playing => dto::GameStateDto::Playing,
            GameState::Finished => dto::GameStateDto::Finished,
        }
    }
}

impl From<MessageKind> for dto::MessageTypeDto {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Chat => dto::MessageTypeDto::Chat,
            MessageKind::Guess => dto::MessageTypeDto::Guess,
            MessageKind::CorrectGuess => dto::MessageTypeDto::CorrectGuess,
            MessageKind::System => dto::MessageTypeDto::System,
        }
    }
}

impl From<RoundEndReason> for dto::RoundEndReasonDto {
    fn from(reason: RoundEndReason) -> Self {
        match reason {
            RoundEndReason::Timeout => dto::RoundEndReasonDto::Timeout,
            RoundEndReason::WordGuessed => dto::RoundEndReasonDto::WordGuessed,
            RoundEndReason::Manual => dto::RoundEndReasonDto::Manual,
        }
    }
}

impl From<&Player> for dto::PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            score: player.score,
            is_host: player.is_host,
            is_current_drawer: player.is_current_drawer,
            has_guessed: player.has_guessed_this_round,
            joined_at: player.joined_at.value(),
        }
    }
}

impl From<&Room> for dto::RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            code: room.join_code.as_str().to_string(),
            host_id: room.host_id.as_str().to_string(),
            host_name: room
                .host()
                .map(|host| host.name.as_str().to_string())
                .unwrap_or_default(),
            max_rounds: room.max_rounds,
            current_round: room.current_round,
            game_state: room.state.into(),
            word_hint: room.word_hint.clone(),
            time_left: room.time_left_seconds,
            is_drawing: room.is_round_active,
            current_drawer_id: room
                .current_drawer_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            players: room.players.iter().map(dto::PlayerDto::from).collect(),
            created_at: room.created_at.value(),
        }
    }
}

impl From<&Message> for dto::ChatMessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            player_id: match &message.author {
                Author::Player(id) => id.as_str().to_string(),
                Author::System => dto::SYSTEM_AUTHOR_ID.to_string(),
            },
            player_name: message.author_name.clone(),
            message: message.text.clone(),
            message_type: message.kind.into(),
            is_correct: message.is_correct,
            timestamp: message.created_at.value(),
        }
    }
}

impl From<&DrawingStroke> for dto::DrawingDataDto {
    fn from(stroke: &DrawingStroke) -> Self {
        Self {
            player_id: stroke.author_id.as_str().to_string(),
            drawing_type: stroke.kind.into(),
            x: stroke.x,
            y: stroke.y,
            color: stroke.color.clone(),
            brush_size: stroke.brush_size,
            tool: stroke.tool.clone(),
            timestamp: stroke.created_at.value(),
        }
    }
}

fn messages(messages: &[Message]) -> Vec<dto::ChatMessageDto> {
    messages.iter().map(dto::ChatMessageDto::from).collect()
}

impl From<&GameEvent> for dto::ServerEvent {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Connected { player_id } => dto::ServerEvent::Connected {
                player_id: player_id.as_str().to_string(),
                message: WELCOME_MESSAGE.to_string(),
            },
            GameEvent::RoomCreated { room } => dto::ServerEvent::RoomCreated {
                room_id: room.id.as_str().to_string(),
                room_code: room.join_code.as_str().to_string(),
                room: room.into(),
            },
            GameEvent::RoomJoined {
                room,
                messages: recent,
                strokes,
            } => dto::ServerEvent::RoomJoined {
                room_id: room.id.as_str().to_string(),
                room_code: room.join_code.as_str().to_string(),
                room: room.into(),
                messages: messages(recent),
                drawing_history: strokes.iter().map(dto::DrawingDataDto::from).collect(),
            },
            GameEvent::PlayerJoined {
                player,
                room,
                messages: recent,
            } => dto::ServerEvent::PlayerJoined {
                player: player.into(),
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::PlayerRejoined {
                player,
                messages: recent,
            } => dto::ServerEvent::PlayerRejoined {
                player: player.into(),
                messages: messages(recent),
            },
            GameEvent::PlayerLeft {
                player_id,
                player_name,
                room,
                messages: recent,
            } => dto::ServerEvent::PlayerLeft {
                player_id: player_id.as_str().to_string(),
                player_name: player_name.clone(),
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::GameStarted {
                room,
                messages: recent,
            } => dto::ServerEvent::GameStarted {
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::WordSelected {
                word,
                word_hint,
                room,
                messages: recent,
            } => dto::ServerEvent::WordSelected {
                word: word.clone(),
                word_hint: word_hint.clone(),
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::NewMessage { message } => dto::ServerEvent::NewMessage {
                message: message.into(),
            },
            GameEvent::CorrectGuess {
                guesser,
                word,
                score,
                room,
                messages: recent,
            } => dto::ServerEvent::CorrectGuess {
                guesser: guesser.name.as_str().to_string(),
                guesser_id: guesser.id.as_str().to_string(),
                word: word.clone(),
                score: *score,
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::TimerUpdate { time_left } => dto::ServerEvent::TimerUpdate {
                time_left: *time_left,
            },
            GameEvent::RoundEnded {
                reason,
                word,
                room,
                messages: recent,
            } => dto::ServerEvent::RoundEnded {
                reason: (*reason).into(),
                word: word.clone(),
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::NextRound {
                room,
                messages: recent,
            } => dto::ServerEvent::NextRound {
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::GameEnded {
                room,
                messages: recent,
            } => dto::ServerEvent::GameEnded {
                room: room.into(),
                messages: messages(recent),
            },
            GameEvent::RoomSettingsUpdated { room } => dto::ServerEvent::RoomSettingsUpdated {
                room: room.into(),
            },
            GameEvent::DrawingUpdate { stroke } => dto::ServerEvent::DrawingUpdate {
                drawing_data: stroke.into(),
            },
            GameEvent::Error { message } => dto::ServerEvent::Error {
                message: message.clone(),
            },
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            code: room.join_code.as_str().to_string(),
            game_state: room.state.into(),
            player_count: room.players.len(),
            current_round: room.current_round,
            max_rounds: room.max_rounds,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            room: room.into(),
            message_count: room.messages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JoinCode, PlayerId, PlayerName, RoomId, Timestamp};

    fn pid(value: &str) -> PlayerId {
        PlayerId::new(value.to_string()).unwrap()
    }

    fn playing_room() -> Room {
        let mut room = Room::new(
            RoomId::new("room-1".to_string()).unwrap(),
            JoinCode::parse("ABC123").unwrap(),
            Player::host(pid("gwen"), PlayerName::new("Gwen").unwrap(), Timestamp::new(1_000)),
            3,
            Timestamp::new(1_000),
        )
        .unwrap();
        room.add_player(pid("miles"), PlayerName::new("Miles").unwrap(), Timestamp::new(2_000))
            .unwrap();
        room.start_game(&pid("gwen"), 2, Timestamp::new(3_000)).unwrap();
        room.select_word(&pid("gwen"), "Venom", 120, Timestamp::new(4_000))
            .unwrap();
        room
    }

    #[test]
    fn test_room_dto_hides_current_word() {
        // テスト項目: ルームの公開ビューにはお題が含まれず、ヒントとホスト名が含まれる
        // given (前提条件):
        let room = playing_room();

        // when (操作):
        let json = serde_json::to_value(dto::RoomDto::from(&room)).unwrap();

        // then (期待する結果):
        assert!(!json.to_string().contains("Venom"));
        assert_eq!(json["code"], "ABC123");
        assert_eq!(json["hostName"], "Gwen");
        assert_eq!(json["wordHint"], "_ _ _ _ _");
        assert_eq!(json["isDrawing"], true);
        assert_eq!(json["currentDrawerId"], "gwen");
        assert_eq!(json["players"][1]["hasGuessed"], false);
    }

    #[test]
    fn test_system_message_uses_system_author_id() {
        // テスト項目: システムメッセージの playerId は "system" になる
        // given (前提条件):
        let message = Message::system("Round 2!", Timestamp::new(5_000));

        // when (操作):
        let dto = dto::ChatMessageDto::from(&message);

        // then (期待する結果):
        assert_eq!(dto.player_id, "system");
        assert_eq!(dto.player_name, "System");
        assert_eq!(dto.message_type, dto::MessageTypeDto::System);
        assert_eq!(dto.is_correct, None);
    }

    #[test]
    fn test_client_message_type_maps_to_message_kind() {
        // テスト項目: messageType の省略はチャット扱い、guess は推測として変換される
        // given (前提条件):
        let chat = dto::ClientCommand::SendMessage {
            content: "hi".to_string(),
            message_type: None,
        };
        let guess = dto::ClientCommand::SendMessage {
            content: "venom".to_string(),
            message_type: Some(dto::ClientMessageType::Guess),
        };

        // when (操作):
        let chat: Command = chat.into();
        let guess: Command = guess.into();

        // then (期待する結果):
        assert!(matches!(chat, Command::SendMessage { kind: MessageKind::Chat, .. }));
        assert!(matches!(guess, Command::SendMessage { kind: MessageKind::Guess, .. }));
    }

    #[test]
    fn test_drawing_type_draw_is_a_point() {
        // テスト項目: drawingType "draw" はストロークの途中の点になる
        // given (前提条件):
        let command = dto::ClientCommand::DrawingData {
            drawing_type: dto::DrawingType::Draw,
            x: Some(1.0),
            y: Some(2.0),
            color: None,
            brush_size: None,
            tool: None,
        };

        // when (操作):
        let command: Command = command.into();

        // then (期待する結果):
        assert!(matches!(command, Command::Draw(StrokeInput { kind: StrokeKind::Point, .. })));
    }

    #[test]
    fn test_correct_guess_event_names_guesser() {
        // テスト項目: correct_guess イベントには正解者の名前と ID、得点が入る
        // given (前提条件):
        let room = playing_room();
        let guesser = room.player(&pid("miles")).unwrap().clone();
        let event = GameEvent::CorrectGuess {
            guesser,
            word: "Venom".to_string(),
            score: 80,
            room: room.clone(),
            messages: room.recent_messages(5),
        };

        // when (操作):
        let json = serde_json::to_value(dto::ServerEvent::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "correct_guess");
        assert_eq!(json["guesser"], "Miles");
        assert_eq!(json["guesserId"], "miles");
        assert_eq!(json["word"], "Venom");
        assert_eq!(json["score"], 80);
        assert_eq!(json["messages"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_room_summary_renders_rfc3339() {
        // テスト項目: ルーム一覧の作成時刻は RFC 3339 で出力される
        // given (前提条件):
        let room = playing_room();

        // when (操作):
        let summary = http::RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(summary.created_at, "1970-01-01T00:00:01.000Z");
        assert_eq!(summary.player_count, 2);
        assert_eq!(summary.game_state, dto::GameStateDto::Playing);
    }
}
