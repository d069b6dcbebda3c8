use chrono::NaiveDate;
use serde::Serialize;

/// Number of days covered by the history view, today included.
pub const HISTORY_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub mood: Option<i32>,
    pub highlight: Option<String>,
}

/// The history window: today and the prior days, oldest first.
pub fn history_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..HISTORY_DAYS)
        .rev()
        .map(|offset| today - chrono::Duration::days(offset))
        .collect()
}
