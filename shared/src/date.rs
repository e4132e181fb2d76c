//! 时间类型模块
//!
//! `Timestamp`: 可序列化的毫秒时间戳，用于传输，并提供展示用的格式化。

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// 后端约定的展示时区（UTC+8）
const DISPLAY_OFFSET_SECS: i32 = 8 * 3600;

/// 毫秒时间戳，用于序列化传输
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// 格式化为 `YYYY-MM-DD HH:MM`（UTC+8）
    ///
    /// 超出可表示范围时返回 `"-"`
    pub fn to_display(&self) -> String {
        let Some(offset) = FixedOffset::east_opt(DISPLAY_OFFSET_SECS) else {
            return "-".to_string();
        };
        self.to_datetime()
            .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}
