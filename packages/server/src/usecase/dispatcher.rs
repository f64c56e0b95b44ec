//! UseCase: コマンドの振り分け
//!
//! 接続ごとのプレイヤー ID と所属ルームを解決し、`GameSession` の操作を呼び出します。
//! 失敗は `error` イベントとしてコマンドを送った本人にだけ返します。

use std::sync::Arc;

use sketchpad_shared::time::Clock;

use crate::domain::{
    Author, ConnectionRegistry, GameError, GameEvent, MessagePusher, PlayerId, PusherChannel,
    RoomId, RoundTick, Timestamp,
};

use super::{command::Command, session::GameSession};

pub struct CommandDispatcher {
    session: GameSession,
    connections: ConnectionRegistry,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl CommandDispatcher {
    pub fn new(
        session: GameSession,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            connections: ConnectionRegistry::new(),
            message_pusher,
            clock,
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// 新しい接続を登録し、挨拶を送る
    pub async fn connect(&mut self, player_id: PlayerId, sender: PusherChannel) {
        let now = Timestamp::new(self.clock.now_millis());
        if !self.connections.open(player_id.clone(), now) {
            tracing::warn!("Player '{}' is already connected", player_id);
            return;
        }
        self.message_pusher
            .register_client(player_id.clone(), sender)
            .await;
        tracing::info!("Player '{}' connected", player_id);

        self.reply(
            &player_id,
            &GameEvent::Connected {
                player_id: player_id.clone(),
            },
        )
        .await;
    }

    /// 切断を処理する。所属していたルームからは通常の離脱として外す。
    pub async fn disconnect(&mut self, player_id: &PlayerId) {
        let Some(connection) = self.connections.close(player_id) else {
            return;
        };
        if let Some(room_id) = connection.room_id {
            if let Err(e) = self.session.leave(player_id, &room_id).await {
                tracing::warn!("Failed to remove '{}' from room '{}': {}", player_id, room_id, e);
            }
        }
        self.message_pusher.unregister_client(player_id).await;
        tracing::info!("Player '{}' disconnected", player_id);
    }

    /// コマンドを実行し、失敗したら送り主にだけエラーを返す
    pub async fn dispatch(&mut self, player_id: PlayerId, command: Command) {
        if !self.connections.is_open(&player_id) {
            tracing::debug!(
                "Dropping '{}' from disconnected player '{}'",
                command.name(),
                player_id
            );
            return;
        }

        let name = command.name();
        if let Err(e) = self.execute(&player_id, command).await {
            tracing::debug!("'{}' from '{}' failed: {}", name, player_id, e);
            self.reject(&player_id, e).await;
        }
    }

    /// 解析できなかったメッセージなどのエラーを送り主に返す
    pub async fn reject(&self, player_id: &PlayerId, error: GameError) {
        self.reply(player_id, &GameEvent::error(error.to_string()))
            .await;
    }

    pub async fn tick(&mut self, tick: RoundTick) {
        if let Err(e) = self.session.tick(tick).await {
            tracing::warn!("Failed to process round tick: {}", e);
        }
    }

    async fn execute(&mut self, player_id: &PlayerId, command: Command) -> Result<(), GameError> {
        match command {
            Command::CreateRoom {
                player_name,
                max_rounds,
            } => {
                // 入力が不正なら今いるルームはそのまま
                self.session.validate_create(&player_name, max_rounds)?;
                self.leave_current_room(player_id).await;
                let room = self
                    .session
                    .create_room(player_id.clone(), &player_name, max_rounds)
                    .await?;
                self.connections.bind(player_id, room.id);
                Ok(())
            }
            Command::JoinRoom {
                room_code,
                player_name,
            } => {
                let (_, target) = self.session.validate_join(&room_code, &player_name).await?;
                if self.connections.room_of(player_id) != Some(&target.id) {
                    self.leave_current_room(player_id).await;
                }
                let room = self
                    .session
                    .join(player_id.clone(), &room_code, &player_name)
                    .await?;
                self.connections.bind(player_id, room.id);
                Ok(())
            }
            Command::StartGame => {
                let room_id = self.current_room(player_id)?;
                self.session.start_game(player_id, &room_id).await
            }
            Command::SendMessage { content, kind } => {
                let room_id = self.current_room(player_id)?;
                self.session
                    .send_chat(Author::Player(player_id.clone()), &room_id, &content, kind)
                    .await
            }
            Command::SendGuess { guess } => {
                let room_id = self.current_room(player_id)?;
                self.session.submit_guess(player_id, &room_id, &guess).await
            }
            Command::Draw(input) => {
                let room_id = self.current_room(player_id)?;
                self.session.relay_drawing(player_id, &room_id, input).await
            }
            Command::SelectWord { word } => {
                let room_id = self.current_room(player_id)?;
                self.session.select_word(player_id, &room_id, &word).await
            }
            Command::UpdateSettings { max_rounds } => {
                let room_id = self.current_room(player_id)?;
                self.session
                    .update_settings(player_id, &room_id, max_rounds)
                    .await
            }
            Command::ClearCanvas => {
                let room_id = self.current_room(player_id)?;
                self.session.clear_canvas(player_id, &room_id).await
            }
        }
    }

    fn current_room(&self, player_id: &PlayerId) -> Result<RoomId, GameError> {
        self.connections
            .room_of(player_id)
            .cloned()
            .ok_or(GameError::NotInRoom)
    }

    async fn leave_current_room(&mut self, player_id: &PlayerId) {
        if let Some(room_id) = self.connections.unbind(player_id) {
            if let Err(e) = self.session.leave(player_id, &room_id).await {
                tracing::warn!("Failed to leave room '{}': {}", room_id, e);
            }
        }
    }

    async fn reply(&self, player_id: &PlayerId, event: &GameEvent) {
        if let Err(e) = self.message_pusher.push_to(player_id, event).await {
            tracing::warn!("Failed to push event to '{}': {}", player_id, e);
        }
    }
}
