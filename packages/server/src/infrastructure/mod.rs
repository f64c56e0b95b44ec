//! Infrastructure 層
//!
//! ドメイン層が定義したポート（Repository, MessagePusher, RoundTimer）の具体的な実装と、
//! ワイヤーフォーマットの DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod round_timer;
