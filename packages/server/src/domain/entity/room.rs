//! Room 集約（ゲームの状態機械）
//!
//! ## 状態遷移
//!
//! ```text
//! Waiting ──start_game──▶ Playing ──(current_round > max_rounds)──▶ Finished
//! ```
//!
//! Playing 中のラウンドは次の順に進みます。
//!
//! ```text
//! AwaitingWord ──select_word──▶ RoundActive ──(正解 / 時間切れ / 描き手の離脱)──▶ RoundOver
//!      ▲                                                                   │
//!      └──────────────────────── 次の描き手へローテーション ────────────────┘
//! ```
//!
//! ## 不変条件
//!
//! - 参加者がいる限りホストはちょうど 1 人
//! - `current_drawer_id` は常に `players` に含まれるプレイヤーを指す
//! - Finished は終端状態。以降はメンバーの離脱（と削除）のみ受け付ける
//! - `players` の並びは参加順であり、そのまま手番順になる

use crate::domain::{
    entity::{DrawingStroke, Message, MessageKind, Player, StrokeKind},
    error::GameError,
    value_object::{JoinCode, PlayerId, PlayerName, RoomId, Timestamp},
};

/// 正解時に残り 1 秒あたりで加算される点数
pub const POINTS_PER_SECOND_LEFT: u32 = 2;

/// 途中参加者向けにバッファするストロークの上限
pub const MAX_BUFFERED_STROKES: usize = 10_000;

/// ヒントで 1 文字を隠す記号
const HINT_PLACEHOLDER: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Waiting,
    Playing,
    Finished,
}

/// ラウンドが終わった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndReason {
    Timeout,
    WordGuessed,
    Manual,
}

/// ラウンド終了後の遷移先
#[derive(Debug, Clone, PartialEq)]
pub enum RoundTransition {
    NextRound { round: u32, drawer: Player },
    GameOver,
}

/// ラウンド終了処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub reason: RoundEndReason,
    /// 終了したラウンドのお題（描き手が選ぶ前に終わった場合は None）
    pub word: Option<String>,
    pub transition: RoundTransition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(Player),
    Rejoined(Player),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub player: Player,
    pub new_host: Option<Player>,
    /// 描き手が抜けたために打ち切られたラウンド
    pub round: Option<RoundOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Correct {
        guesser: Player,
        word: String,
        points: u32,
        round: RoundOutcome,
    },
    Incorrect(Message),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// 古いタイマーや終了済みラウンドへの tick
    Ignored,
    Running { time_left: u32 },
    Expired(RoundOutcome),
}

/// ゲームルーム
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub join_code: JoinCode,
    pub host_id: PlayerId,
    pub max_rounds: u32,
    pub current_round: u32,
    pub state: GameState,
    pub current_word: Option<String>,
    pub word_hint: Option<String>,
    pub time_left_seconds: u32,
    pub is_round_active: bool,
    pub current_drawer_id: Option<PlayerId>,
    /// 参加順 = 手番順
    pub players: Vec<Player>,
    /// 追記のみのチャットログ
    pub messages: Vec<Message>,
    /// 現在のラウンドのストローク（途中参加者への再生用）
    pub strokes: Vec<DrawingStroke>,
    pub created_at: Timestamp,
}

impl Room {
    /// ホストだけが参加している新しいルームを作成
    pub fn new(
        id: RoomId,
        join_code: JoinCode,
        host: Player,
        max_rounds: u32,
        created_at: Timestamp,
    ) -> Result<Self, GameError> {
        if max_rounds < 1 {
            return Err(GameError::InvalidSettings("maxRounds must be at least 1"));
        }
        let mut host = host;
        host.is_host = true;
        host.is_current_drawer = false;
        let welcome = format!(
            "Welcome to Sketchpad! {} created room {}. Waiting for players to join...",
            host.name, join_code
        );
        Ok(Self {
            id,
            join_code,
            host_id: host.id.clone(),
            max_rounds,
            current_round: 1,
            state: GameState::Waiting,
            current_word: None,
            word_hint: None,
            time_left_seconds: 0,
            is_round_active: false,
            current_drawer_id: None,
            players: vec![host],
            messages: vec![Message::system(welcome, created_at)],
            strokes: Vec::new(),
            created_at,
        })
    }

    // ========================================
    // 参照系
    // ========================================

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    fn player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == player_id)
    }

    fn position(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == player_id)
    }

    pub fn host(&self) -> Option<&Player> {
        self.player(&self.host_id)
    }

    pub fn current_drawer(&self) -> Option<&Player> {
        self.current_drawer_id.as_ref().and_then(|id| self.player(id))
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    /// 指定したプレイヤー以外の全員の ID
    pub fn player_ids_except(&self, excluded: &PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| &p.id != excluded)
            .map(|p| p.id.clone())
            .collect()
    }

    /// 直近 `count` 件のメッセージ（古い順）
    pub fn recent_messages(&self, count: usize) -> Vec<Message> {
        let start = self.messages.len().saturating_sub(count);
        self.messages[start..].to_vec()
    }

    /// `since` より後のメッセージを古い順に最大 `limit` 件返す
    ///
    /// `since` が無い場合は直近 `limit` 件。
    pub fn messages_since(&self, since: Option<Timestamp>, limit: usize) -> Vec<Message> {
        match since {
            Some(since) => self
                .messages
                .iter()
                .filter(|m| m.created_at > since)
                .take(limit)
                .cloned()
                .collect(),
            None => self.recent_messages(limit),
        }
    }

    // ========================================
    // メンバーシップ
    // ========================================

    /// プレイヤーを参加させる。既知のプレイヤーなら再接続として扱う。
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        name: PlayerName,
        now: Timestamp,
    ) -> Result<JoinOutcome, GameError> {
        if self.state == GameState::Finished {
            return Err(GameError::GameAlreadyFinished);
        }

        if let Some(existing) = self.player_mut(&player_id) {
            existing.has_guessed_this_round = false;
            existing.name = name;
            let rejoined = existing.clone();
            self.push_system(format!("{} rejoined the game!", rejoined.name), now);
            return Ok(JoinOutcome::Rejoined(rejoined));
        }

        let player = Player::new(player_id, name, now);
        self.push_system(format!("{} joined the game!", player.name), now);
        self.players.push(player.clone());
        Ok(JoinOutcome::Joined(player))
    }

    /// プレイヤーを外す
    ///
    /// 描き手が抜けた場合は時間切れと同じ経路でラウンドを終わらせ、
    /// 抜けたプレイヤーの次の参加者に手番を回す。
    /// ホストが抜けた場合は最も早く参加した残りのプレイヤーを昇格させる。
    pub fn remove_player(
        &mut self,
        player_id: &PlayerId,
        now: Timestamp,
    ) -> Result<LeaveOutcome, GameError> {
        let slot = self.position(player_id).ok_or(GameError::NotInRoom)?;
        let player = self.players.remove(slot);
        self.push_system(format!("{} left the game", player.name), now);

        if self.players.is_empty() {
            self.current_drawer_id = None;
            self.is_round_active = false;
            return Ok(LeaveOutcome {
                player,
                new_host: None,
                round: None,
            });
        }

        let new_host = if player.is_host {
            let promoted = &mut self.players[0];
            promoted.is_host = true;
            let promoted = promoted.clone();
            self.host_id = promoted.id.clone();
            self.push_system(format!("{} is now the host", promoted.name), now);
            Some(promoted)
        } else {
            None
        };

        let round = if self.state == GameState::Playing
            && self.current_drawer_id.as_ref() == Some(&player.id)
        {
            self.current_drawer_id = None;
            // 抜けた位置には次の参加者が詰められている
            Some(self.finish_round(RoundEndReason::Timeout, slot, now))
        } else {
            None
        };

        Ok(LeaveOutcome {
            player,
            new_host,
            round,
        })
    }

    // ========================================
    // ゲーム進行
    // ========================================

    /// ゲームを開始し、最初に参加したプレイヤーを描き手にする
    pub fn start_game(
        &mut self,
        requester: &PlayerId,
        min_players: usize,
        now: Timestamp,
    ) -> Result<Player, GameError> {
        if self.player(requester).is_none() {
            return Err(GameError::NotInRoom);
        }
        if &self.host_id != requester {
            return Err(GameError::NotAuthorized);
        }
        match self.state {
            GameState::Waiting => {}
            GameState::Playing => return Err(GameError::InvalidState("Game has already started")),
            GameState::Finished => {
                return Err(GameError::InvalidState("Game has already finished"));
            }
        }
        if self.players.len() < min_players {
            return Err(GameError::NotEnoughPlayers {
                required: min_players,
                actual: self.players.len(),
            });
        }

        self.state = GameState::Playing;
        let drawer = &mut self.players[0];
        drawer.is_current_drawer = true;
        let drawer = drawer.clone();
        self.current_drawer_id = Some(drawer.id.clone());
        self.push_system(
            format!("Game started! {} is drawing first!", drawer.name),
            now,
        );
        Ok(drawer)
    }

    /// 描き手がお題を決め、ラウンドを開始する
    pub fn select_word(
        &mut self,
        drawer_id: &PlayerId,
        word: &str,
        round_seconds: u32,
        now: Timestamp,
    ) -> Result<(), GameError> {
        match self.state {
            GameState::Playing => {}
            GameState::Waiting => return Err(GameError::InvalidState("Game has not started yet")),
            GameState::Finished => {
                return Err(GameError::InvalidState("Game has already finished"));
            }
        }
        if self.current_drawer_id.as_ref() != Some(drawer_id) {
            return Err(GameError::NotCurrentDrawer);
        }
        if self.is_round_active {
            return Err(GameError::InvalidState(
                "A word has already been selected this round",
            ));
        }
        let word = word.trim();
        if word.is_empty() {
            return Err(GameError::InvalidWord);
        }

        self.current_word = Some(word.to_string());
        self.word_hint = Some(mask_word(word));
        self.is_round_active = true;
        self.time_left_seconds = round_seconds;
        for player in &mut self.players {
            player.has_guessed_this_round = false;
        }
        self.strokes.clear();

        let drawer_name = self
            .player(drawer_id)
            .map(|p| p.name.to_string())
            .unwrap_or_default();
        self.push_system(
            format!("{drawer_name} is now drawing! Start guessing!"),
            now,
        );
        Ok(())
    }

    /// 推測を判定する。不正解は回数を消費しない。
    pub fn submit_guess(
        &mut self,
        player_id: &PlayerId,
        guess: &str,
        now: Timestamp,
    ) -> Result<GuessOutcome, GameError> {
        let player = self.player(player_id).ok_or(GameError::NotInRoom)?;
        if player.has_guessed_this_round {
            return Err(GameError::AlreadyGuessed);
        }
        if self.current_drawer_id.as_ref() == Some(player_id) {
            return Err(GameError::CannotGuessOwnDrawing);
        }
        let word = match (&self.current_word, self.is_round_active) {
            (Some(word), true) => word.clone(),
            _ => return Err(GameError::NoActiveRound),
        };
        if guess.trim().is_empty() {
            return Err(GameError::EmptyMessage);
        }

        if !is_correct_guess(&word, guess) {
            let message = Message::from_player(
                player_id.clone(),
                player.name.as_str(),
                guess.trim(),
                MessageKind::Guess,
                now,
            );
            self.messages.push(message.clone());
            return Ok(GuessOutcome::Incorrect(message));
        }

        let points = self.time_left_seconds * POINTS_PER_SECOND_LEFT;
        let guesser = {
            let player = self
                .player_mut(player_id)
                .ok_or(GameError::NotInRoom)?;
            player.has_guessed_this_round = true;
            player.score += points;
            player.clone()
        };
        self.messages.push(Message::from_player(
            player_id.clone(),
            guesser.name.as_str(),
            guess.trim(),
            MessageKind::CorrectGuess,
            now,
        ));
        self.push_system(
            format!(
                "{} guessed correctly! It was \"{}\"! (+{} points)",
                guesser.name, word, points
            ),
            now,
        );

        let next_slot = self.drawer_slot().map_or(0, |slot| slot + 1);
        let round = self.finish_round(RoundEndReason::WordGuessed, next_slot, now);
        Ok(GuessOutcome::Correct {
            guesser,
            word,
            points,
            round,
        })
    }

    /// プレイヤーのチャットを追加
    pub fn post_chat(
        &mut self,
        player_id: &PlayerId,
        text: &str,
        now: Timestamp,
    ) -> Result<Message, GameError> {
        let player = self.player(player_id).ok_or(GameError::NotInRoom)?;
        if self.state == GameState::Finished {
            return Err(GameError::GameAlreadyFinished);
        }
        if text.trim().is_empty() {
            return Err(GameError::EmptyMessage);
        }
        let message = Message::from_player(
            player_id.clone(),
            player.name.as_str(),
            text.trim(),
            MessageKind::Chat,
            now,
        );
        self.messages.push(message.clone());
        Ok(message)
    }

    /// システムメッセージを追加（プレイヤーは不要）
    pub fn post_system(&mut self, text: &str, now: Timestamp) -> Result<Message, GameError> {
        if text.trim().is_empty() {
            return Err(GameError::EmptyMessage);
        }
        Ok(self.push_system(text.trim().to_string(), now))
    }

    /// 描き手のストロークを記録する（全消去ならバッファを捨てる）
    pub fn record_stroke(&mut self, stroke: &DrawingStroke) -> Result<(), GameError> {
        if self.current_drawer_id.as_ref() != Some(&stroke.author_id) {
            return Err(GameError::NotCurrentDrawer);
        }
        if !self.is_round_active {
            return Err(GameError::NoActiveRound);
        }
        match stroke.kind {
            StrokeKind::Clear => self.strokes.clear(),
            _ if self.strokes.len() < MAX_BUFFERED_STROKES => self.strokes.push(stroke.clone()),
            _ => {}
        }
        Ok(())
    }

    /// 1 秒分タイマーを進める
    ///
    /// `round` はタイマー開始時のラウンド番号。現在のラウンドと違えば無視する。
    pub fn tick(&mut self, round: u32, now: Timestamp) -> TickOutcome {
        if !self.is_round_active || round != self.current_round {
            return TickOutcome::Ignored;
        }
        self.time_left_seconds = self.time_left_seconds.saturating_sub(1);
        if self.time_left_seconds > 0 {
            return TickOutcome::Running {
                time_left: self.time_left_seconds,
            };
        }
        let next_slot = self.drawer_slot().map_or(0, |slot| slot + 1);
        TickOutcome::Expired(self.finish_round(RoundEndReason::Timeout, next_slot, now))
    }

    /// 現在のラウンドを終わらせて次へ進める
    pub fn advance_round(
        &mut self,
        reason: RoundEndReason,
        now: Timestamp,
    ) -> Result<RoundOutcome, GameError> {
        if self.state != GameState::Playing || self.players.is_empty() {
            return Err(GameError::InvalidState("Game is not in progress"));
        }
        let next_slot = self.drawer_slot().map_or(0, |slot| slot + 1);
        Ok(self.finish_round(reason, next_slot, now))
    }

    /// ホストがルーム設定を変更する
    pub fn update_settings(
        &mut self,
        requester: &PlayerId,
        max_rounds: Option<u32>,
    ) -> Result<(), GameError> {
        if self.player(requester).is_none() {
            return Err(GameError::NotInRoom);
        }
        if &self.host_id != requester {
            return Err(GameError::NotAuthorized);
        }
        if self.state == GameState::Finished {
            return Err(GameError::InvalidState("Game has already finished"));
        }
        if let Some(max_rounds) = max_rounds {
            if max_rounds < 1 {
                return Err(GameError::InvalidSettings("maxRounds must be at least 1"));
            }
            if max_rounds < self.current_round {
                return Err(GameError::InvalidSettings(
                    "maxRounds cannot be lower than the current round",
                ));
            }
            self.max_rounds = max_rounds;
        }
        Ok(())
    }

    // ========================================
    // 内部処理
    // ========================================

    fn drawer_slot(&self) -> Option<usize> {
        self.current_drawer_id
            .as_ref()
            .and_then(|id| self.position(id))
    }

    fn push_system(&mut self, text: String, now: Timestamp) -> Message {
        let message = Message::system(text, now);
        self.messages.push(message.clone());
        message
    }

    /// ラウンド終了の共通処理（正解・時間切れ・手動・描き手離脱）
    ///
    /// `next_slot` は次の描き手を探し始める `players` 上の位置。
    fn finish_round(
        &mut self,
        reason: RoundEndReason,
        next_slot: usize,
        now: Timestamp,
    ) -> RoundOutcome {
        self.is_round_active = false;
        self.time_left_seconds = 0;
        let word = self.current_word.clone();

        match (reason, &word) {
            (RoundEndReason::Timeout, Some(word)) => {
                self.push_system(format!("Time's up! The word was: {word}"), now);
            }
            (RoundEndReason::Timeout, None) => {
                self.push_system("Round skipped before a word was chosen".to_string(), now);
            }
            (RoundEndReason::WordGuessed, Some(word)) => {
                self.push_system(format!("Round over! The word was: {word}"), now);
            }
            (RoundEndReason::WordGuessed, None) | (RoundEndReason::Manual, _) => {}
        }

        self.current_round += 1;
        self.strokes.clear();
        for player in &mut self.players {
            player.has_guessed_this_round = false;
            player.is_current_drawer = false;
        }
        self.current_drawer_id = None;
        self.current_word = None;
        self.word_hint = None;

        let next = rotation_slot(self.players.len(), next_slot);
        match next {
            Some(slot) if self.current_round <= self.max_rounds => {
                let drawer = &mut self.players[slot];
                drawer.is_current_drawer = true;
                let drawer = drawer.clone();
                self.current_drawer_id = Some(drawer.id.clone());
                self.push_system(
                    format!(
                        "Round {}! {} is drawing next!",
                        self.current_round, drawer.name
                    ),
                    now,
                );
                RoundOutcome {
                    reason,
                    word,
                    transition: RoundTransition::NextRound {
                        round: self.current_round,
                        drawer,
                    },
                }
            }
            _ => {
                self.state = GameState::Finished;
                self.push_system("Game finished! Thanks for playing!".to_string(), now);
                RoundOutcome {
                    reason,
                    word,
                    transition: RoundTransition::GameOver,
                }
            }
        }
    }
}

/// 手番ローテーション
///
/// `slot` 番目（末尾を超えたら先頭に戻る）のプレイヤー位置を返す。
/// プレイヤーがいなければ None。
pub fn rotation_slot(player_count: usize, slot: usize) -> Option<usize> {
    (player_count > 0).then(|| slot % player_count)
}

/// お題を伏せ字にする（空白も 1 文字として伏せる）
pub fn mask_word(word: &str) -> String {
    word.chars()
        .map(|_| HINT_PLACEHOLDER)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 大文字小文字と前後の空白を無視した完全一致
pub fn is_correct_guess(word: &str, guess: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}
