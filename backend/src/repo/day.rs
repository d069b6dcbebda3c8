//! Calendar-day inference for hosted rows.
//!
//! Hosted rows arrive as loose JSON objects whose day column may be a plain
//! date, a timestamp, or missing. Each row's day is inferred by trying the
//! [`DAY_STRATEGIES`] in order; the first one that yields a date wins.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::history::{history_window, HistoryEntry};

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStrategy {
    /// `day` is a string starting with `YYYY-MM-DD`.
    DayPrefix,
    /// `day` parses as a timestamp.
    DayTimestamp,
    /// `created_at`, then `inserted_at`, parses as a timestamp.
    CreationTimestamp,
    /// Any string field that looks like a timestamp, in key order.
    AnyTimestampField,
}

pub const DAY_STRATEGIES: [DayStrategy; 4] = [
    DayStrategy::DayPrefix,
    DayStrategy::DayTimestamp,
    DayStrategy::CreationTimestamp,
    DayStrategy::AnyTimestampField,
];

impl DayStrategy {
    pub fn extract(self, row: &Row) -> Option<NaiveDate> {
        match self {
            DayStrategy::DayPrefix => row.get("day").and_then(Value::as_str).and_then(ymd_prefix),
            DayStrategy::DayTimestamp => row.get("day").and_then(value_to_day),
            DayStrategy::CreationTimestamp => ["created_at", "inserted_at"]
                .iter()
                .find_map(|key| row.get(*key).and_then(value_to_day)),
            DayStrategy::AnyTimestampField => row.values().find_map(|v| match v {
                Value::String(s) if s.len() > 8 && s.contains('-') => parse_timestamp(s),
                _ => None,
            }),
        }
    }
}

/// Infer the calendar day a row belongs to, if any strategy succeeds.
pub fn normalize_day(row: &Row) -> Option<NaiveDate> {
    DAY_STRATEGIES.iter().find_map(|s| s.extract(row))
}

fn ymd_prefix(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    let shaped = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn value_to_day(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_timestamp(s),
        // Numbers are epoch milliseconds.
        Value::Number(n) => {
            let millis = n.as_i64()?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .map(|dt| dt.with_timezone(&Local).date_naive())
        }
        _ => None,
    }
}

/// Parse a timestamp-ish string into a server-local calendar day.
/// Offset-carrying timestamps are shifted to local time; naive ones are
/// taken as already local.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Local).date_naive());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Project mood and reflection rows onto the history window ending `today`.
/// Missing moods are null; missing reflections are empty strings.
pub fn build_history(today: NaiveDate, moods: &[Row], reflections: &[Row]) -> Vec<HistoryEntry> {
    let mut mood_by_day: HashMap<NaiveDate, i32> = HashMap::new();
    for row in moods {
        let mood = row
            .get("mood")
            .and_then(Value::as_i64)
            .and_then(|m| i32::try_from(m).ok());
        if let (Some(day), Some(mood)) = (normalize_day(row), mood) {
            mood_by_day.insert(day, mood);
        }
    }

    let mut text_by_day: HashMap<NaiveDate, String> = HashMap::new();
    for row in reflections {
        if let (Some(day), Some(text)) = (normalize_day(row), row.get("text").and_then(Value::as_str)) {
            text_by_day.insert(day, text.to_string());
        }
    }

    history_window(today)
        .into_iter()
        .map(|date| HistoryEntry {
            date,
            mood: mood_by_day.get(&date).copied(),
            highlight: Some(text_by_day.get(&date).cloned().unwrap_or_default()),
        })
        .collect()
}
