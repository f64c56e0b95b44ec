//! ゲームエンジン（単一タスクのイベントループ）
//!
//! 全てのルーム操作は 1 つのタスクが `EngineEvent` を順に処理することで行います。
//! 1 つのイベントを処理し終えるまで次のイベントは始まらないため、
//! 最初の正解者は構造的に 1 人に決まり、ルーム単位のロックも不要です。
//!
//! ```text
//! WebSocket 接続 ──EngineEvent──┐
//!                               ├──▶ Engine ──▶ CommandDispatcher ──▶ GameSession
//! RoundTimer ─────RoundTick─────┘
//! ```

use tokio::sync::mpsc;

use crate::domain::{GameError, PlayerId, PusherChannel, RoundTick};

use super::{command::Command, dispatcher::CommandDispatcher};

/// 接続からエンジンへ送られるイベント
#[derive(Debug)]
pub enum EngineEvent {
    Connected {
        player_id: PlayerId,
        sender: PusherChannel,
    },
    Command {
        player_id: PlayerId,
        command: Command,
    },
    /// 解析できなかったフレーム
    Invalid {
        player_id: PlayerId,
        error: GameError,
    },
    Disconnected {
        player_id: PlayerId,
    },
}

/// エンジンへイベントを送るためのハンドル（接続ごとに clone して使う）
#[derive(Debug, Clone)]
pub struct EngineHandle {
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    /// エンジンが止まっていれば false
    pub fn send(&self, event: EngineEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn connect(&self, player_id: PlayerId, sender: PusherChannel) -> bool {
        self.send(EngineEvent::Connected { player_id, sender })
    }

    pub fn command(&self, player_id: PlayerId, command: Command) -> bool {
        self.send(EngineEvent::Command { player_id, command })
    }

    pub fn invalid(&self, player_id: PlayerId, error: GameError) -> bool {
        self.send(EngineEvent::Invalid { player_id, error })
    }

    pub fn disconnect(&self, player_id: PlayerId) -> bool {
        self.send(EngineEvent::Disconnected { player_id })
    }
}

pub struct Engine {
    dispatcher: CommandDispatcher,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    ticks: mpsc::UnboundedReceiver<RoundTick>,
}

impl Engine {
    /// エンジンとそのハンドルを作成
    ///
    /// `ticks` はラウンドタイマーの送信先と対になる受信側。
    pub fn new(
        dispatcher: CommandDispatcher,
        ticks: mpsc::UnboundedReceiver<RoundTick>,
    ) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            dispatcher,
            events: rx,
            ticks,
        };
        (engine, EngineHandle { events: tx })
    }

    /// 全てのハンドルが drop されるまでイベントを処理する
    pub async fn run(mut self) {
        tracing::info!("Game engine started");
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                Some(tick) = self.ticks.recv() => {
                    self.dispatcher.tick(tick).await;
                }
            }
        }
        tracing::info!("Game engine stopped");
    }

    async fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Connected { player_id, sender } => {
                self.dispatcher.connect(player_id, sender).await;
            }
            EngineEvent::Command { player_id, command } => {
                self.dispatcher.dispatch(player_id, command).await;
            }
            EngineEvent::Invalid { player_id, error } => {
                self.dispatcher.reject(&player_id, error).await;
            }
            EngineEvent::Disconnected { player_id } => {
                self.dispatcher.disconnect(&player_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use sketchpad_shared::time::{Clock, FixedClock};

    use crate::{
        domain::{GameConfig, MessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
            round_timer::TokioRoundTimer,
        },
        usecase::session::GameSession,
    };

    fn spawn_engine(config: GameConfig) -> EngineHandle {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(1_000));
        let pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
        let session = GameSession::new(
            Arc::new(InMemoryRoomRepository::new()),
            pusher.clone(),
            Box::new(TokioRoundTimer::new(tick_tx)),
            clock.clone(),
            config,
        );
        let dispatcher = CommandDispatcher::new(session, pusher, clock);
        let (engine, handle) = Engine::new(dispatcher, tick_rx);
        tokio::spawn(engine.run());
        handle
    }

    fn pid(value: &str) -> PlayerId {
        PlayerId::new(value.to_string()).unwrap()
    }

    async fn next_json(rx: &mut mpsc::UnboundedReceiver<String>) -> serde_json::Value {
        let text = rx.recv().await.unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// 指定した type のイベントが来るまで読み飛ばす
    async fn next_of_type(
        rx: &mut mpsc::UnboundedReceiver<String>,
        event_type: &str,
    ) -> serde_json::Value {
        loop {
            let json = next_json(rx).await;
            if json["type"] == event_type {
                return json;
            }
        }
    }

    #[tokio::test]
    async fn test_engine_processes_events_in_order() {
        // テスト項目: 接続・コマンド・解析エラーが送った順に処理される
        // given (前提条件):
        let handle = spawn_engine(GameConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        handle.connect(pid("gwen"), tx);
        handle.invalid(pid("gwen"), GameError::InvalidMessageFormat);
        handle.command(
            pid("gwen"),
            Command::CreateRoom {
                player_name: "Gwen".to_string(),
                max_rounds: None,
            },
        );

        // then (期待する結果):
        assert_eq!(next_json(&mut rx).await["type"], "connected");
        let error = next_json(&mut rx).await;
        assert_eq!(error["type"], "error");
        assert_eq!(error["message"], "Invalid message format");
        let created = next_json(&mut rx).await;
        assert_eq!(created["type"], "room_created");
        assert_eq!(created["room"]["maxRounds"], 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_timer_drives_countdown() {
        // テスト項目: お題選択後、タイマーの tick で timer_update が届く
        // given (前提条件):
        let handle = spawn_engine(GameConfig::debug());
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.connect(pid("gwen"), tx);
        handle.command(
            pid("gwen"),
            Command::CreateRoom {
                player_name: "Gwen".to_string(),
                max_rounds: Some(1),
            },
        );
        handle.command(pid("gwen"), Command::StartGame);
        handle.command(
            pid("gwen"),
            Command::SelectWord {
                word: "Venom".to_string(),
            },
        );
        next_of_type(&mut rx, "word_selected").await;

        // when (操作):
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        // then (期待する結果):
        let update = next_of_type(&mut rx, "timer_update").await;
        assert_eq!(update["timeLeft"], 119);
    }
}
