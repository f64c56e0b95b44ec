//! ゲームのルール設定

/// 1 ラウンドの制限時間（秒）
pub const DEFAULT_ROUND_SECONDS: u32 = 120;

/// ゲーム開始に必要な人数
pub const DEFAULT_MIN_PLAYERS: usize = 2;

/// ルーム作成時に省略された場合のラウンド数
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// 参加時に送る直近メッセージ数
pub const JOIN_REPLAY_MESSAGES: usize = 10;

/// ゲームイベントに添える直近メッセージ数
pub const EVENT_RECENT_MESSAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub round_seconds: u32,
    pub min_players: usize,
    pub default_max_rounds: u32,
}

impl GameConfig {
    /// 1 人でもゲームを開始できるデバッグ用設定
    pub fn debug() -> Self {
        Self {
            min_players: 1,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            min_players: DEFAULT_MIN_PLAYERS,
            default_max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_config_allows_solo_start() {
        // テスト項目: デバッグ設定では最小人数が 1 になり、他は既定値のまま
        // given (前提条件):

        // when (操作):
        let config = GameConfig::debug();

        // then (期待する結果):
        assert_eq!(config.min_players, 1);
        assert_eq!(config.round_seconds, 120);
        assert_eq!(config.default_max_rounds, 5);
    }
}
