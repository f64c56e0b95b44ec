//! ラウンドタイマーの実装
//!
//! - `interval`: ルームごとに tokio の interval タスクを立てる実装

pub mod interval;

pub use interval::TokioRoundTimer;
