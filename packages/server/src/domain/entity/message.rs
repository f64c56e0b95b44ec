//! Message エンティティ（チャット・推測・システム通知）

use crate::domain::value_object::{MessageId, PlayerId, Timestamp};

/// システムメッセージの表示名
pub const SYSTEM_AUTHOR_NAME: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Chat,
    Guess,
    CorrectGuess,
    System,
}

/// メッセージの送り手
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Player(PlayerId),
    System,
}

/// チャットログの 1 行。作成後は変更されない。
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub author_name: String,
    pub text: String,
    pub kind: MessageKind,
    pub is_correct: Option<bool>,
    pub created_at: Timestamp,
}

impl Message {
    /// エンジンが生成するシステムメッセージ
    pub fn system(text: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            author: Author::System,
            author_name: SYSTEM_AUTHOR_NAME.to_string(),
            text: text.into(),
            kind: MessageKind::System,
            is_correct: None,
            created_at,
        }
    }

    /// プレイヤーが送ったメッセージ
    pub fn from_player(
        author_id: PlayerId,
        author_name: &str,
        text: impl Into<String>,
        kind: MessageKind,
        created_at: Timestamp,
    ) -> Self {
        let is_correct = match kind {
            MessageKind::Guess => Some(false),
            MessageKind::CorrectGuess => Some(true),
            MessageKind::Chat | MessageKind::System => None,
        };
        Self {
            id: MessageId::generate(),
            author: Author::Player(author_id),
            author_name: author_name.to_string(),
            text: text.into(),
            kind,
            is_correct,
            created_at,
        }
    }
}
