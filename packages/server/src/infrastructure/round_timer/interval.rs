//! tokio タスクによる RoundTimer 実装
//!
//! ルームごとに 1 秒間隔のタスクを立て、`RoundTick` をエンジンのキューへ送ります。
//! ラウンドが早く終わったとき、ルームが削除されたとき、新しいタイマーに置き換えたときに
//! タスクを abort します。

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::{RoomId, RoundTick, RoundTimer};

/// tick の間隔
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct TokioRoundTimer {
    ticks: mpsc::UnboundedSender<RoundTick>,
    interval: Duration,
    tasks: HashMap<RoomId, JoinHandle<()>>,
}

impl TokioRoundTimer {
    pub fn new(ticks: mpsc::UnboundedSender<RoundTick>) -> Self {
        Self::with_interval(ticks, TICK_INTERVAL)
    }

    pub fn with_interval(ticks: mpsc::UnboundedSender<RoundTick>, interval: Duration) -> Self {
        Self {
            ticks,
            interval,
            tasks: HashMap::new(),
        }
    }

    pub fn active_timers(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl RoundTimer for TokioRoundTimer {
    fn start(&mut self, room_id: RoomId, round: u32) {
        let ticks = self.ticks.clone();
        let period = self.interval;
        let tick = RoundTick {
            room_id: room_id.clone(),
            round,
        };
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(tick.clone()).is_err() {
                    // エンジンが止まっている
                    break;
                }
            }
        });

        if let Some(previous) = self.tasks.insert(room_id.clone(), task) {
            previous.abort();
        }
        tracing::debug!("Round timer started for room '{}' (round {})", room_id, round);
    }

    fn cancel(&mut self, room_id: &RoomId) {
        if let Some(task) = self.tasks.remove(room_id) {
            task.abort();
            tracing::debug!("Round timer cancelled for room '{}'", room_id);
        }
    }
}

impl Drop for TokioRoundTimer {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}
