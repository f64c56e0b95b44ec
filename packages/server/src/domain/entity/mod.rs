//! エンティティ（Entity）
//!
//! Room 集約とその構成要素（Player, Message, DrawingStroke）を定義します。

pub mod drawing;
pub mod message;
pub mod player;
pub mod room;

pub use drawing::{DrawingStroke, StrokeKind};
pub use message::{Author, Message, MessageKind};
pub use player::Player;
pub use room::{
    GameState, GuessOutcome, JoinOutcome, LeaveOutcome, Room, RoundEndReason, RoundOutcome,
    RoundTransition, TickOutcome, is_correct_guess, mask_word, rotation_slot,
};
