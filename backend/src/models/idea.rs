use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Idea {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub user_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
