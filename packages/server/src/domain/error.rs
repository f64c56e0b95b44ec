//! ドメインエラー定義
//!
//! エラーは全て回復可能で、コマンドを送ったクライアントにだけ `error` イベントとして返されます。

use thiserror::Error;

use super::value_object::ValueObjectError;

/// ゲーム操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Game has already finished")]
    GameAlreadyFinished,
    #[error("You are not allowed to do that")]
    NotAuthorized,
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("Not in room")]
    NotInRoom,
    #[error("You have already guessed this round")]
    AlreadyGuessed,
    #[error("You cannot guess your own drawing")]
    CannotGuessOwnDrawing,
    #[error("No round is active")]
    NoActiveRound,
    #[error("Only the current drawer can do that")]
    NotCurrentDrawer,
    #[error("Unknown message type")]
    UnknownCommand,
    #[error("Invalid message format")]
    InvalidMessageFormat,
    #[error("Need at least {required} players to start the game")]
    NotEnoughPlayers { required: usize, actual: usize },
    #[error("Invalid room settings: {0}")]
    InvalidSettings(&'static str),
    #[error("Word must not be empty")]
    InvalidWord,
    #[error("Invalid player name: {0}")]
    InvalidPlayerName(ValueObjectError),
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Internal server error")]
    Storage(#[from] RepositoryError),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("could not allocate a free join code after {0} attempts")]
    JoinCodeExhausted(usize),
    #[error("room rejected: {0}")]
    InvalidRoom(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_user_facing() {
        // テスト項目: エラーメッセージがクライアントにそのまま表示できる文言になっている
        // given (前提条件):
        let errors = [
            (GameError::RoomNotFound, "Room not found"),
            (GameError::InvalidMessageFormat, "Invalid message format"),
            (GameError::UnknownCommand, "Unknown message type"),
            (
                GameError::NotEnoughPlayers {
                    required: 2,
                    actual: 1,
                },
                "Need at least 2 players to start the game",
            ),
        ];

        // when (操作) / then (期待する結果):
        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_repository_error_is_hidden_behind_generic_message() {
        // テスト項目: Repository のエラーは内部情報を漏らさない汎用メッセージになる
        // given (前提条件):
        let repository_error = RepositoryError::JoinCodeExhausted(64);

        // when (操作):
        let error: GameError = repository_error.into();

        // then (期待する結果):
        assert_eq!(error.to_string(), "Internal server error");
    }
}
