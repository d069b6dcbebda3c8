use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A to-do item pinned to the day it was created on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    /// Owner; only set by the hosted store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub day: NaiveDate,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Local rows keep `completed` as a 0/1 integer.
#[derive(Debug, sqlx::FromRow)]
pub struct LocalTaskRow {
    pub id: i64,
    pub day: NaiveDate,
    pub text: String,
    pub completed: i64,
}

impl From<LocalTaskRow> for Task {
    fn from(row: LocalTaskRow) -> Self {
        Self {
            id: row.id,
            user_id: None,
            day: row.day,
            text: row.text,
            completed: row.completed != 0,
            created_at: None,
        }
    }
}
