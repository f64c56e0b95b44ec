//! ドメイン層
//!
//! ゲームのルール（Room 集約）と、外部とのやり取りに必要なポート（trait）を定義します。
//! ドメイン層は他のどの層にも依存しません。

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod round_timer;
pub mod value_object;

pub use config::GameConfig;
pub use connection::{Connection, ConnectionRegistry};
pub use entity::{
    Author, DrawingStroke, GameState, GuessOutcome, JoinOutcome, LeaveOutcome, Message,
    MessageKind, Player, Room, RoundEndReason, RoundOutcome, RoundTransition, StrokeKind,
    TickOutcome,
};
pub use error::{GameError, MessagePushError, RepositoryError};
pub use event::GameEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use round_timer::{RoundTick, RoundTimer};
pub use value_object::{
    JoinCode, MessageId, PlayerId, PlayerName, RoomId, Timestamp, ValueObjectError,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use round_timer::MockRoundTimer;
