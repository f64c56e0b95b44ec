//! UseCase 層
//!
//! - `command`: 接続から届くコマンド
//! - `session`: ルームのゲーム進行
//! - `dispatcher`: コマンドの振り分けと接続管理
//! - `engine`: 全てのイベントを 1 つずつ処理するイベントループ
//! - `query`: HTTP API 向けのルーム参照

pub mod command;
pub mod dispatcher;
pub mod engine;
pub mod query;
pub mod session;

pub use command::{Command, StrokeInput};
pub use dispatcher::CommandDispatcher;
pub use engine::{Engine, EngineEvent, EngineHandle};
pub use query::{RoomQueryError, RoomQueryUseCase};
pub use session::GameSession;
