//! Repository trait 定義
//!
//! ドメイン層が必要とするルームストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Player, Room},
    error::RepositoryError,
    value_object::{JoinCode, RoomId, Timestamp},
};

/// Room Repository trait
///
/// 稼働中のルームを ID と参加コードの両方で引けるようにする。
/// 参加コードは稼働中のルームの間で一意で、削除後は再利用できる。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 一意な参加コードを払い出してルームを作成
    async fn create_room(
        &self,
        host: Player,
        max_rounds: u32,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    async fn find_by_id(&self, room_id: &RoomId) -> Option<Room>;

    /// 参加コードでルームを検索（コードは大文字に正規化済み）
    async fn find_by_code(&self, join_code: &JoinCode) -> Option<Room>;

    /// ルームの状態を保存（作成済みのルームのみ）
    async fn save(&self, room: Room) -> Result<(), RepositoryError>;

    /// ルームを削除。存在しなければ何もしない。
    async fn delete(&self, room_id: &RoomId);

    /// 稼働中の全ルーム（作成順）
    async fn list(&self) -> Vec<Room>;
}
