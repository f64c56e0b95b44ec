//! 描画ストロークイベント
//!
//! 描き手以外のクライアントへ中継されるだけで、権威的な状態ではありません。
//! 途中参加者向けに現在のラウンド分だけ Room がバッファします。

use crate::domain::value_object::{PlayerId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Start,
    Point,
    End,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingStroke {
    pub author_id: PlayerId,
    pub kind: StrokeKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<String>,
    pub brush_size: Option<f64>,
    pub tool: Option<String>,
    pub created_at: Timestamp,
}

impl DrawingStroke {
    /// キャンバス全消去のストローク
    pub fn clear(author_id: PlayerId, created_at: Timestamp) -> Self {
        Self {
            author_id,
            kind: StrokeKind::Clear,
            x: None,
            y: None,
            color: None,
            brush_size: None,
            tool: None,
            created_at,
        }
    }
}
