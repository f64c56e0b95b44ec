//! UseCase: ルームのゲーム進行
//!
//! Room 集約の操作を Repository からの読み込み・保存、クライアントへの通知、
//! ラウンドタイマーの開始・停止と結び付けます。
//!
//! 全ての操作はエンジンタスクから 1 つずつ呼ばれるため、
//! 同じルームへの変更が並行することはありません。

use std::sync::Arc;

use sketchpad_shared::time::Clock;

use crate::domain::{
    Author, DrawingStroke, GameConfig, GameError, GameEvent, GameState, GuessOutcome, JoinCode,
    JoinOutcome, MessageKind, MessagePusher, Player, PlayerId, PlayerName, Room, RoomId,
    RoomRepository, RoundEndReason, RoundOutcome, RoundTick, RoundTimer, RoundTransition,
    TickOutcome, Timestamp,
    config::{EVENT_RECENT_MESSAGES, JOIN_REPLAY_MESSAGES},
};

use super::command::StrokeInput;

/// ゲーム進行のユースケース
pub struct GameSession {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    round_timer: Box<dyn RoundTimer>,
    clock: Arc<dyn Clock>,
    config: GameConfig,
}

impl GameSession {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        round_timer: Box<dyn RoundTimer>,
        clock: Arc<dyn Clock>,
        config: GameConfig,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            round_timer,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    async fn load(&self, room_id: &RoomId) -> Result<Room, GameError> {
        self.repository
            .find_by_id(room_id)
            .await
            .ok_or(GameError::RoomNotFound)
    }

    /// 参加コードからルームを引く（形式が不正なコードも「見つからない」扱い）
    pub async fn find_by_code(&self, room_code: &str) -> Result<Room, GameError> {
        let code = JoinCode::parse(room_code).map_err(|_| GameError::RoomNotFound)?;
        self.repository
            .find_by_code(&code)
            .await
            .ok_or(GameError::RoomNotFound)
    }

    // ========================================
    // メンバーシップ
    // ========================================

    /// ルーム作成の入力を検証する（ルームには触れない）
    pub fn validate_create(
        &self,
        player_name: &str,
        max_rounds: Option<u32>,
    ) -> Result<(PlayerName, u32), GameError> {
        let name = PlayerName::new(player_name).map_err(GameError::InvalidPlayerName)?;
        let max_rounds = max_rounds.unwrap_or(self.config.default_max_rounds);
        if max_rounds < 1 {
            return Err(GameError::InvalidSettings("maxRounds must be at least 1"));
        }
        Ok((name, max_rounds))
    }

    /// 参加の入力と参加先ルームを検証する（ルームには触れない）
    pub async fn validate_join(
        &self,
        room_code: &str,
        player_name: &str,
    ) -> Result<(PlayerName, Room), GameError> {
        let name = PlayerName::new(player_name).map_err(GameError::InvalidPlayerName)?;
        let room = self.find_by_code(room_code).await?;
        if room.state == GameState::Finished {
            return Err(GameError::GameAlreadyFinished);
        }
        Ok((name, room))
    }

    /// ルームを作成し、作成者をホストとして参加させる
    pub async fn create_room(
        &mut self,
        player_id: PlayerId,
        player_name: &str,
        max_rounds: Option<u32>,
    ) -> Result<Room, GameError> {
        let (name, max_rounds) = self.validate_create(player_name, max_rounds)?;

        let now = self.now();
        let host = Player::host(player_id.clone(), name, now);
        let room = self.repository.create_room(host, max_rounds, now).await?;
        tracing::info!(
            "Room {} created by {} ({} rounds)",
            room.join_code,
            player_name.trim(),
            room.max_rounds
        );

        self.push(&player_id, &GameEvent::RoomCreated { room: room.clone() })
            .await;
        Ok(room)
    }

    /// 参加コードでルームに参加する（既に参加済みなら再接続）
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        room_code: &str,
        player_name: &str,
    ) -> Result<Room, GameError> {
        let (name, mut room) = self.validate_join(room_code, player_name).await?;

        let outcome = room.add_player(player_id.clone(), name, self.now())?;
        self.repository.save(room.clone()).await?;

        match outcome {
            JoinOutcome::Joined(player) => {
                tracing::info!("{} joined room {}", player.name, room.join_code);
                self.broadcast(
                    room.player_ids_except(&player_id),
                    &GameEvent::PlayerJoined {
                        player,
                        room: room.clone(),
                        messages: room.recent_messages(JOIN_REPLAY_MESSAGES),
                    },
                )
                .await;
            }
            JoinOutcome::Rejoined(player) => {
                tracing::info!("{} rejoined room {}", player.name, room.join_code);
                self.broadcast(
                    room.player_ids_except(&player_id),
                    &GameEvent::PlayerRejoined {
                        player,
                        messages: room.recent_messages(JOIN_REPLAY_MESSAGES),
                    },
                )
                .await;
            }
        }

        self.push(
            &player_id,
            &GameEvent::RoomJoined {
                room: room.clone(),
                messages: room.recent_messages(JOIN_REPLAY_MESSAGES),
                strokes: room.strokes.clone(),
            },
        )
        .await;
        Ok(room)
    }

    /// ルームから抜ける。空になったルームは削除する。
    pub async fn leave(&mut self, player_id: &PlayerId, room_id: &RoomId) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        let outcome = room.remove_player(player_id, self.now())?;
        tracing::info!("{} left room {}", outcome.player.name, room.join_code);

        if room.is_empty() {
            self.round_timer.cancel(&room.id);
            self.repository.delete(&room.id).await;
            tracing::info!("Room {} deleted (no players left)", room.join_code);
            return Ok(());
        }

        self.repository.save(room.clone()).await?;
        self.broadcast(
            room.player_ids(),
            &GameEvent::PlayerLeft {
                player_id: outcome.player.id.clone(),
                player_name: outcome.player.name.to_string(),
                room: room.clone(),
                messages: room.recent_messages(EVENT_RECENT_MESSAGES),
            },
        )
        .await;

        if let Some(round) = outcome.round {
            self.announce_round_end(&room, round).await;
        }
        Ok(())
    }

    // ========================================
    // ゲーム進行
    // ========================================

    pub async fn start_game(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        let drawer = room.start_game(player_id, self.config.min_players, self.now())?;
        self.repository.save(room.clone()).await?;
        tracing::info!(
            "Game started in room {} ({} draws first)",
            room.join_code,
            drawer.name
        );

        self.broadcast(
            room.player_ids(),
            &GameEvent::GameStarted {
                room: room.clone(),
                messages: room.recent_messages(JOIN_REPLAY_MESSAGES),
            },
        )
        .await;
        Ok(())
    }

    /// 描き手がお題を決める。お題は描き手にだけ送り、他のプレイヤーにはヒントを送る。
    pub async fn select_word(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
        word: &str,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        room.select_word(player_id, word, self.config.round_seconds, self.now())?;
        self.repository.save(room.clone()).await?;

        let word_hint = room.word_hint.clone().unwrap_or_default();
        let messages = room.recent_messages(EVENT_RECENT_MESSAGES);
        self.push(
            player_id,
            &GameEvent::WordSelected {
                word: room.current_word.clone(),
                word_hint: word_hint.clone(),
                room: room.clone(),
                messages: messages.clone(),
            },
        )
        .await;
        self.broadcast(
            room.player_ids_except(player_id),
            &GameEvent::WordSelected {
                word: None,
                word_hint,
                room: room.clone(),
                messages,
            },
        )
        .await;

        self.round_timer.start(room.id.clone(), room.current_round);
        Ok(())
    }

    /// 推測を判定する。正解ならラウンドを進める。
    pub async fn submit_guess(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
        guess: &str,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        let outcome = room.submit_guess(player_id, guess, self.now())?;
        self.repository.save(room.clone()).await?;

        match outcome {
            GuessOutcome::Incorrect(message) => {
                self.broadcast(room.player_ids(), &GameEvent::NewMessage { message })
                    .await;
            }
            GuessOutcome::Correct {
                guesser,
                word,
                points,
                round,
            } => {
                tracing::info!(
                    "{} guessed '{}' in room {} (+{} points)",
                    guesser.name,
                    word,
                    room.join_code,
                    points
                );
                self.broadcast(
                    room.player_ids(),
                    &GameEvent::CorrectGuess {
                        guesser,
                        word,
                        score: points,
                        room: room.clone(),
                        messages: room.recent_messages(EVENT_RECENT_MESSAGES),
                    },
                )
                .await;
                self.announce_round_end(&room, round).await;
            }
        }
        Ok(())
    }

    /// メッセージを投稿する。`kind` が推測なら推測として判定する。
    ///
    /// システムメッセージはサーバー自身（`Author::System`）だけが投稿できる。
    pub async fn send_chat(
        &mut self,
        author: Author,
        room_id: &RoomId,
        text: &str,
        kind: MessageKind,
    ) -> Result<(), GameError> {
        let player_id = match (author, kind) {
            (Author::Player(player_id), MessageKind::Guess) => {
                return self.submit_guess(&player_id, room_id, text).await;
            }
            (Author::Player(_), MessageKind::System | MessageKind::CorrectGuess) => {
                return Err(GameError::NotAuthorized);
            }
            (Author::Player(player_id), MessageKind::Chat) => Some(player_id),
            (Author::System, _) => None,
        };

        let mut room = self.load(room_id).await?;
        let now = self.now();
        let message = match &player_id {
            Some(player_id) => room.post_chat(player_id, text, now)?,
            None => room.post_system(text, now)?,
        };
        self.repository.save(room.clone()).await?;

        self.broadcast(room.player_ids(), &GameEvent::NewMessage { message })
            .await;
        Ok(())
    }

    /// 描き手のストロークを他のプレイヤーへ中継する
    pub async fn relay_drawing(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
        input: StrokeInput,
    ) -> Result<(), GameError> {
        let stroke = DrawingStroke {
            author_id: player_id.clone(),
            kind: input.kind,
            x: input.x,
            y: input.y,
            color: input.color,
            brush_size: input.brush_size,
            tool: input.tool,
            created_at: self.now(),
        };
        self.record_and_relay(room_id, stroke).await
    }

    /// キャンバスを全消去する
    pub async fn clear_canvas(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
    ) -> Result<(), GameError> {
        let stroke = DrawingStroke::clear(player_id.clone(), self.now());
        self.record_and_relay(room_id, stroke).await
    }

    async fn record_and_relay(
        &mut self,
        room_id: &RoomId,
        stroke: DrawingStroke,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        room.record_stroke(&stroke)?;
        self.repository.save(room.clone()).await?;

        self.broadcast(
            room.player_ids_except(&stroke.author_id),
            &GameEvent::DrawingUpdate { stroke },
        )
        .await;
        Ok(())
    }

    /// タイマーの 1 秒分を処理する。存在しないルームや古いラウンドへの tick は無視する。
    pub async fn tick(&mut self, tick: RoundTick) -> Result<(), GameError> {
        let Some(mut room) = self.repository.find_by_id(&tick.room_id).await else {
            self.round_timer.cancel(&tick.room_id);
            return Ok(());
        };

        match room.tick(tick.round, self.now()) {
            TickOutcome::Ignored => Ok(()),
            TickOutcome::Running { time_left } => {
                self.repository.save(room.clone()).await?;
                self.broadcast(room.player_ids(), &GameEvent::TimerUpdate { time_left })
                    .await;
                Ok(())
            }
            TickOutcome::Expired(outcome) => {
                self.repository.save(room.clone()).await?;
                self.broadcast(room.player_ids(), &GameEvent::TimerUpdate { time_left: 0 })
                    .await;
                self.announce_round_end(&room, outcome).await;
                Ok(())
            }
        }
    }

    /// ラウンドを終わらせて次へ進める
    pub async fn advance_round(
        &mut self,
        room_id: &RoomId,
        reason: RoundEndReason,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        let outcome = room.advance_round(reason, self.now())?;
        self.repository.save(room.clone()).await?;
        self.announce_round_end(&room, outcome).await;
        Ok(())
    }

    /// ホストがルーム設定を変更する
    pub async fn update_settings(
        &mut self,
        player_id: &PlayerId,
        room_id: &RoomId,
        max_rounds: Option<u32>,
    ) -> Result<(), GameError> {
        let mut room = self.load(room_id).await?;
        room.update_settings(player_id, max_rounds)?;
        self.repository.save(room.clone()).await?;

        self.broadcast(
            room.player_ids(),
            &GameEvent::RoomSettingsUpdated { room: room.clone() },
        )
        .await;
        Ok(())
    }

    // ========================================
    // 通知
    // ========================================

    /// ラウンド終了を通知し、タイマーを止める
    async fn announce_round_end(&mut self, room: &Room, outcome: RoundOutcome) {
        self.round_timer.cancel(&room.id);
        let targets = room.player_ids();
        let messages = room.recent_messages(EVENT_RECENT_MESSAGES);

        if outcome.reason != RoundEndReason::Manual {
            self.broadcast(
                targets.clone(),
                &GameEvent::RoundEnded {
                    reason: outcome.reason,
                    word: outcome.word,
                    room: room.clone(),
                    messages: messages.clone(),
                },
            )
            .await;
        }

        let event = match outcome.transition {
            RoundTransition::NextRound { round, drawer } => {
                tracing::info!(
                    "Room {} moved to round {} ({} draws)",
                    room.join_code,
                    round,
                    drawer.name
                );
                GameEvent::NextRound {
                    room: room.clone(),
                    messages,
                }
            }
            RoundTransition::GameOver => {
                tracing::info!("Game finished in room {}", room.join_code);
                GameEvent::GameEnded {
                    room: room.clone(),
                    messages,
                }
            }
        };
        self.broadcast(targets, &event).await;
    }

    async fn push(&self, player_id: &PlayerId, event: &GameEvent) {
        if let Err(e) = self.message_pusher.push_to(player_id, event).await {
            tracing::warn!("Failed to push event to '{}': {}", player_id, e);
        }
    }

    async fn broadcast(&self, targets: Vec<PlayerId>, event: &GameEvent) {
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast event: {}", e);
        }
    }
}
