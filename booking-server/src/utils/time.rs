//! 时间工具函数 — 日期字符串解析
//!
//! All date→timestamp conversion happens once at the engine boundary;
//! the storage layer only sees `i64` Unix millis. Comparison is naive:
//! values without an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::types::Timestamp;

/// Accepted naive formats, tried in order
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a caller-supplied timestamp string into Unix millis
///
/// Accepts RFC 3339 (offset honoured) and the naive `YYYY-MM-DDTHH:MM[:SS]`
/// forms the front end sends. A bare `YYYY-MM-DD` means midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(parse_timestamp("1970-01-01T01:00:00+01:00"), Some(0));
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        assert_eq!(parse_timestamp("1970-01-01T00:01"), Some(60_000));
        assert_eq!(parse_timestamp("1970-01-01T00:00:02"), Some(2_000));
        assert_eq!(parse_timestamp("1970-01-02"), Some(86_400_000));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2024-13-40T99:99"), None);
    }
}
