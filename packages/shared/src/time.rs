//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps are Unix milliseconds in UTC.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp()
    }
}

/// Manually driven clock for tests.
///
/// Returns the same instant until it is moved with [`FixedClock::advance`].
#[derive(Debug, Default)]
pub struct FixedClock {
    fixed_time: AtomicI64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: AtomicI64::new(fixed_time_millis),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.fixed_time.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC.
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // テスト項目: SystemClock が呼び出すたびに増加するタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp1 = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 1234567890123;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp1 = clock.now_millis();
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert_eq!(timestamp1, fixed_time);
        assert_eq!(timestamp2, fixed_time);
    }

    #[test]
    fn test_fixed_clock_advance_moves_time_forward() {
        // テスト項目: FixedClock::advance で時刻が進む
        // given (前提条件):
        let clock = FixedClock::new(1_000);

        // when (操作):
        clock.advance(250);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 1_250);
    }

    #[test]
    fn test_timestamp_to_rfc3339_format() {
        // テスト項目: タイムスタンプが正しく RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00.123 UTC in milliseconds
        let timestamp = 1672531200123;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_get_timestamp_returns_positive_value() {
        // テスト項目: get_timestamp が正の値を返す
        // given (前提条件):

        // when (操作):
        let timestamp = get_timestamp();

        // then (期待する結果):
        assert!(timestamp > 0);
    }
}
