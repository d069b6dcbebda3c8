use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single mood value stored for a (user, day).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MoodRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub user_id: Option<i64>,
    pub day: NaiveDate,
    pub mood: i32,
}

/// The single reflection stored for a (user, day).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ReflectionRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub user_id: Option<i64>,
    pub day: NaiveDate,
    pub text: String,
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TodayBundle {
    pub tasks: Vec<crate::models::task::Task>,
    pub mood: Option<i32>,
    pub reflection: Option<String>,
}
