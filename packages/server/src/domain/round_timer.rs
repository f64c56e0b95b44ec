//! ラウンドタイマーの抽象化
//!
//! タイマーは 1 秒ごとに `RoundTick` をエンジンのキューへ積むだけで、
//! 残り時間の管理は Room 集約が行います。

use super::value_object::RoomId;

/// タイマーがエンジンへ送る 1 秒分の通知
///
/// `round` はタイマー開始時のラウンド番号で、古いタイマーの tick を見分けるのに使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTick {
    pub room_id: RoomId,
    pub round: u32,
}

#[cfg_attr(test, mockall::automock)]
pub trait RoundTimer: Send + Sync {
    /// ルームのタイマーを開始（既存のタイマーは置き換える）
    fn start(&mut self, room_id: RoomId, round: u32);

    /// ルームのタイマーを止める。動いていなければ何もしない。
    fn cancel(&mut self, room_id: &RoomId);
}
