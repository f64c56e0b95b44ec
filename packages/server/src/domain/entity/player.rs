//! Player エンティティ

use crate::domain::value_object::{PlayerId, PlayerName, Timestamp};

/// ルームに参加しているプレイヤー
///
/// スコアは増加のみ。ホストと描き手のフラグは Room が整合性を保ちます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub score: u32,
    pub is_host: bool,
    pub is_current_drawer: bool,
    pub has_guessed_this_round: bool,
    pub joined_at: Timestamp,
}

impl Player {
    /// 新しいゲスト（ホストでも描き手でもない）を作成
    pub fn new(id: PlayerId, name: PlayerName, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            score: 0,
            is_host: false,
            is_current_drawer: false,
            has_guessed_this_round: false,
            joined_at,
        }
    }

    /// ルーム作成者（ホスト）を作成
    pub fn host(id: PlayerId, name: PlayerName, joined_at: Timestamp) -> Self {
        Self {
            is_host: true,
            ..Self::new(id, name, joined_at)
        }
    }
}
