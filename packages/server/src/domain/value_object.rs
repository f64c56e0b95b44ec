//! 値オブジェクト（Value Object）
//!
//! 識別子やプレイヤー名など、生成時に検証される不変の値を定義します。
//! 不正な値はコンストラクタで弾くため、ドメインロジックは検証済みの値だけを扱えます。

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ルーム参加コードの長さ
pub const JOIN_CODE_LENGTH: usize = 6;

/// 参加コードに使う文字集合
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// プレイヤー名の最大文字数
pub const MAX_PLAYER_NAME_CHARS: usize = 32;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("player name must be at most {MAX_PLAYER_NAME_CHARS} characters")]
    PlayerNameTooLong,
    #[error("room code must be {JOIN_CODE_LENGTH} letters or digits")]
    MalformedJoinCode,
}

/// プレイヤー ID（接続ごとにサーバーが払い出す不透明な ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// 新しいランダムな PlayerId を生成
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("player id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルーム ID（内部識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("room id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 人が共有するための 6 文字の参加コード
///
/// 大文字英字と数字のみ。入力は大文字に正規化されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinCode(String);

impl JoinCode {
    /// ランダムな参加コードを生成（重複チェックは Repository の責務）
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..JOIN_CODE_LENGTH)
            .map(|_| char::from(JOIN_CODE_ALPHABET[rng.random_range(0..JOIN_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// ユーザー入力から参加コードを作成
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.len() != JOIN_CODE_LENGTH
            || !normalized.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b))
        {
            return Err(ValueObjectError::MalformedJoinCode);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名（前後の空白は除去）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("player name"));
        }
        if trimmed.chars().count() > MAX_PLAYER_NAME_CHARS {
            return Err(ValueObjectError::PlayerNameTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_code_generate_has_expected_shape() {
        // テスト項目: 生成された参加コードが 6 文字の英大文字・数字で構成される
        // given (前提条件):

        // when (操作):
        let code = JoinCode::generate();

        // then (期待する結果):
        assert_eq!(code.as_str().len(), JOIN_CODE_LENGTH);
        assert!(JoinCode::parse(code.as_str()).is_ok());
    }

    #[test]
    fn test_join_code_parse_normalizes_case_and_whitespace() {
        // テスト項目: 参加コードの入力が大文字に正規化され、空白が除去される
        // given (前提条件):
        let input = " ab12cd ";

        // when (操作):
        let code = JoinCode::parse(input);

        // then (期待する結果):
        assert_eq!(code.unwrap().as_str(), "AB12CD");
    }

    #[test]
    fn test_join_code_parse_rejects_wrong_length_and_symbols() {
        // テスト項目: 長さ違い・記号入りの参加コードは拒否される
        // given (前提条件):
        let inputs = ["ABC", "ABCDEFG", "AB-12C", ""];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(
                JoinCode::parse(input),
                Err(ValueObjectError::MalformedJoinCode),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_player_name_is_trimmed() {
        // テスト項目: プレイヤー名の前後の空白が除去される
        // given (前提条件):
        let input = "  Gwen ";

        // when (操作):
        let name = PlayerName::new(input).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Gwen");
    }

    #[test]
    fn test_player_name_rejects_blank_and_too_long() {
        // テスト項目: 空白のみ・長すぎるプレイヤー名は拒否される
        // given (前提条件):
        let too_long = "x".repeat(MAX_PLAYER_NAME_CHARS + 1);

        // when (操作):
        let blank = PlayerName::new("   ");
        let long = PlayerName::new(&too_long);

        // then (期待する結果):
        assert_eq!(blank, Err(ValueObjectError::Empty("player name")));
        assert_eq!(long, Err(ValueObjectError::PlayerNameTooLong));
    }

    #[test]
    fn test_generated_player_ids_are_unique() {
        // テスト項目: 生成される PlayerId が一意である
        // given (前提条件):

        // when (操作):
        let a = PlayerId::generate();
        let b = PlayerId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
