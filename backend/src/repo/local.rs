use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use crate::auth::identity::Caller;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::history::{history_window, HistoryEntry, HISTORY_DAYS};
use crate::models::idea::Idea;
use crate::models::journal::{MoodRow, ReflectionRow, TodayBundle};
use crate::models::task::{LocalTaskRow, Task};
use crate::repo::{required_text, Repository, StorageMode, IDEA_LIST_LIMIT};

/// Single-tenant store on an embedded SQLite file. Callers are ignored:
/// every record is visible to and writable by everyone.
#[derive(Clone)]
pub struct LocalRepository {
    db: SqlitePool,
}

#[derive(Debug, FromRow)]
struct JoinedDay {
    day: NaiveDate,
    mood: i32,
    highlight: Option<String>,
}

impl LocalRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Open (or create) the store at `database_path` and apply the schema.
    pub async fn open(database_path: &str) -> anyhow::Result<Self> {
        let db = db::create_pool(database_path).await?;
        db::run_migrations(&db).await?;
        Ok(Self::new(db))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

#[async_trait]
impl Repository for LocalRepository {
    fn mode(&self) -> StorageMode {
        StorageMode::Local
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }

    async fn today(&self, _caller: Option<&Caller>, day: NaiveDate) -> AppResult<TodayBundle> {
        let tasks = sqlx::query_as::<_, LocalTaskRow>(
            "SELECT id, day, text, completed FROM tasks WHERE day = ? ORDER BY id DESC",
        )
        .bind(day)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(Task::from)
        .collect();

        let mood = sqlx::query_scalar::<_, i32>("SELECT mood FROM moods WHERE day = ?")
            .bind(day)
            .fetch_optional(&self.db)
            .await?;

        let reflection = sqlx::query_scalar::<_, String>("SELECT text FROM reflections WHERE day = ?")
            .bind(day)
            .fetch_optional(&self.db)
            .await?;

        Ok(TodayBundle {
            tasks,
            mood,
            reflection,
        })
    }

    async fn add_task(&self, _caller: Option<&Caller>, day: NaiveDate, text: &str) -> AppResult<Task> {
        let text = required_text(text, "task")?;

        let row = sqlx::query_as::<_, LocalTaskRow>(
            r#"
            INSERT INTO tasks (day, text, completed)
            VALUES (?, ?, 0)
            RETURNING id, day, text, completed
            "#,
        )
        .bind(day)
        .bind(text)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn toggle_task(&self, _caller: Option<&Caller>, id: i64) -> AppResult<bool> {
        let completed = sqlx::query_scalar::<_, i64>("SELECT completed FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        let new_val: i64 = if completed != 0 { 0 } else { 1 };
        sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
            .bind(new_val)
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(new_val != 0)
    }

    async fn delete_task(&self, _caller: Option<&Caller>, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }

    async fn list_ideas(&self, _caller: Option<&Caller>) -> AppResult<Vec<Idea>> {
        let ideas = sqlx::query_as::<_, Idea>(
            "SELECT id, text, created_at FROM ideas ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(IDEA_LIST_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(ideas)
    }

    async fn add_idea(&self, _caller: Option<&Caller>, text: &str) -> AppResult<Idea> {
        let text = required_text(text, "idea")?;

        let idea = sqlx::query_as::<_, Idea>(
            "INSERT INTO ideas (text) VALUES (?) RETURNING id, text, created_at",
        )
        .bind(text)
        .fetch_one(&self.db)
        .await?;

        Ok(idea)
    }

    async fn delete_idea(&self, _caller: Option<&Caller>, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Idea not found".into()));
        }
        Ok(())
    }

    async fn set_mood(&self, _caller: Option<&Caller>, day: NaiveDate, mood: i32) -> AppResult<MoodRow> {
        // `day` is the whole key here, so a single upsert is safe.
        let row = sqlx::query_as::<_, MoodRow>(
            r#"
            INSERT INTO moods (day, mood) VALUES (?, ?)
            ON CONFLICT (day) DO UPDATE SET mood = excluded.mood
            RETURNING day, mood
            "#,
        )
        .bind(day)
        .bind(mood)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn set_reflection(
        &self,
        _caller: Option<&Caller>,
        day: NaiveDate,
        text: &str,
    ) -> AppResult<ReflectionRow> {
        let row = sqlx::query_as::<_, ReflectionRow>(
            r#"
            INSERT INTO reflections (day, text) VALUES (?, ?)
            ON CONFLICT (day) DO UPDATE SET text = excluded.text
            RETURNING day, text
            "#,
        )
        .bind(day)
        .bind(text.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn history(&self, _caller: Option<&Caller>, today: NaiveDate) -> AppResult<Vec<HistoryEntry>> {
        let window = history_window(today);

        // Driven by moods: a day with only a reflection does not show up.
        let rows = sqlx::query_as::<_, JoinedDay>(
            r#"
            SELECT m.day AS day, m.mood AS mood, r.text AS highlight
            FROM moods m
            LEFT JOIN reflections r ON r.day = m.day
            WHERE m.day BETWEEN ? AND ?
            ORDER BY m.day DESC
            LIMIT ?
            "#,
        )
        .bind(window[0])
        .bind(today)
        .bind(HISTORY_DAYS)
        .fetch_all(&self.db)
        .await?;

        let by_day: HashMap<NaiveDate, JoinedDay> = rows.into_iter().map(|r| (r.day, r)).collect();

        Ok(window
            .into_iter()
            .map(|date| match by_day.get(&date) {
                Some(row) => HistoryEntry {
                    date,
                    mood: Some(row.mood),
                    highlight: row.highlight.clone(),
                },
                None => HistoryEntry {
                    date,
                    mood: None,
                    highlight: None,
                },
            })
            .collect())
    }
}
