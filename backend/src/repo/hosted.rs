use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use futures_util::future::{try_join, try_join3};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::identity::Caller;
use crate::error::{AppError, AppResult};
use crate::models::history::HistoryEntry;
use crate::models::idea::Idea;
use crate::models::journal::{MoodRow, ReflectionRow, TodayBundle};
use crate::models::task::Task;
use crate::models::user::UserRecord;
use crate::repo::day::{build_history, Row};
use crate::repo::postgrest::PostgrestClient;
use crate::repo::{require_caller, required_text, Repository, StorageMode, IDEA_LIST_LIMIT};

/// How far back history rows are fetched before day normalization.
const HISTORY_LOOKBACK_DAYS: i64 = 30;
/// Row cap per table for the history fetch.
const HISTORY_ROW_LIMIT: i64 = 500;

const TASK_COLUMNS: &str = "id,user_id,day,text,completed,created_at";
const IDEA_COLUMNS: &str = "id,user_id,text,created_at";

/// Multi-tenant store behind the hosted PostgREST API. Every query is scoped
/// to the caller, and mutations check the row owner first.
#[derive(Clone)]
pub struct HostedRepository {
    client: PostgrestClient,
}

#[derive(Debug, Deserialize)]
struct Owned {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct TaskState {
    user_id: i64,
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct MoodValue {
    mood: Option<i32>,
}

/// Rows whose owner can be checked against the caller.
trait OwnedRow {
    fn owner(&self) -> i64;
}

impl OwnedRow for Owned {
    fn owner(&self) -> i64 {
        self.user_id
    }
}

impl OwnedRow for TaskState {
    fn owner(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug, Deserialize)]
struct ReflectionText {
    text: Option<String>,
}

impl HostedRepository {
    pub fn new(url: &str, service_key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: PostgrestClient::new(url, service_key)?,
        })
    }

    /// Refresh the caller's advisory profile row.
    async fn ensure_user(&self, caller: &Caller) -> AppResult<()> {
        self.client
            .from("users")
            .on_conflict("id")
            .upsert(&UserRecord::from(caller))
            .await
    }

    /// Fetch `columns` of row `id` from `table`. Not found when the row is
    /// missing, forbidden when someone else owns it.
    async fn owned_row<T>(&self, table: &str, label: &str, columns: &str, id: i64, caller: &Caller) -> AppResult<T>
    where
        T: OwnedRow + DeserializeOwned,
    {
        let row = self
            .client
            .from(table)
            .select(columns)
            .eq("id", id)
            .fetch::<T>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("{} not found", label)))?;

        if row.owner() != caller.id {
            tracing::warn!(table, id, caller_id = caller.id, "Ownership check failed");
            return Err(AppError::Forbidden);
        }
        Ok(row)
    }

    async fn check_owner(&self, table: &str, label: &str, id: i64, caller: &Caller) -> AppResult<()> {
        self.owned_row::<Owned>(table, label, "user_id", id, caller)
            .await
            .map(|_| ())
    }

    fn first<T>(rows: Vec<T>, what: &str) -> AppResult<T> {
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Hosted(format!("{} write returned no row", what)))
    }
}

#[async_trait]
impl Repository for HostedRepository {
    fn mode(&self) -> StorageMode {
        StorageMode::Hosted
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .from("users")
            .select("id")
            .limit(1)
            .fetch::<Value>()
            .await
            .map(|_| ())
    }

    async fn today(&self, caller: Option<&Caller>, day: NaiveDate) -> AppResult<TodayBundle> {
        let caller = require_caller(caller)?;

        let tasks = self
            .client
            .from("tasks")
            .select(TASK_COLUMNS)
            .eq("user_id", caller.id)
            .eq("day", day)
            .order("created_at", false)
            .fetch::<Task>();
        let moods = self
            .client
            .from("moods")
            .select("mood")
            .eq("user_id", caller.id)
            .eq("day", day)
            .limit(1)
            .fetch::<MoodValue>();
        let reflections = self
            .client
            .from("reflections")
            .select("text")
            .eq("user_id", caller.id)
            .eq("day", day)
            .limit(1)
            .fetch::<ReflectionText>();

        let (tasks, moods, reflections) = try_join3(tasks, moods, reflections).await?;

        Ok(TodayBundle {
            tasks,
            mood: moods.into_iter().next().and_then(|m| m.mood),
            reflection: reflections.into_iter().next().and_then(|r| r.text),
        })
    }

    async fn add_task(&self, caller: Option<&Caller>, day: NaiveDate, text: &str) -> AppResult<Task> {
        let text = required_text(text, "task")?;
        let caller = require_caller(caller)?;
        self.ensure_user(caller).await?;

        let rows = self
            .client
            .from("tasks")
            .insert::<_, Task>(&json!({
                "user_id": caller.id,
                "day": day,
                "text": text,
                "completed": false,
            }))
            .await?;
        Self::first(rows, "task")
    }

    async fn toggle_task(&self, caller: Option<&Caller>, id: i64) -> AppResult<bool> {
        let caller = require_caller(caller)?;

        let state: TaskState = self
            .owned_row("tasks", "Task", "user_id,completed", id, caller)
            .await?;

        let new_val = !state.completed;
        self.client
            .from("tasks")
            .eq("id", id)
            .update::<_, Value>(&json!({ "completed": new_val }))
            .await?;

        Ok(new_val)
    }

    async fn delete_task(&self, caller: Option<&Caller>, id: i64) -> AppResult<()> {
        let caller = require_caller(caller)?;
        self.check_owner("tasks", "Task", id, caller).await?;
        self.client.from("tasks").eq("id", id).delete().await
    }

    async fn list_ideas(&self, caller: Option<&Caller>) -> AppResult<Vec<Idea>> {
        let caller = require_caller(caller)?;

        self.client
            .from("ideas")
            .select(IDEA_COLUMNS)
            .eq("user_id", caller.id)
            .order("created_at", false)
            .limit(IDEA_LIST_LIMIT)
            .fetch()
            .await
    }

    async fn add_idea(&self, caller: Option<&Caller>, text: &str) -> AppResult<Idea> {
        let text = required_text(text, "idea")?;
        let caller = require_caller(caller)?;
        self.ensure_user(caller).await?;

        let rows = self
            .client
            .from("ideas")
            .insert::<_, Idea>(&json!({ "user_id": caller.id, "text": text }))
            .await?;
        Self::first(rows, "idea")
    }

    async fn delete_idea(&self, caller: Option<&Caller>, id: i64) -> AppResult<()> {
        let caller = require_caller(caller)?;
        self.check_owner("ideas", "Idea", id, caller).await?;
        self.client.from("ideas").eq("id", id).delete().await
    }

    // Moods and reflections are written update-then-insert rather than with
    // an upsert. Two concurrent first writes for the same (user, day) can
    // both miss the update; the second insert then fails on the unique key
    // and surfaces as a backend error.

    async fn set_mood(&self, caller: Option<&Caller>, day: NaiveDate, mood: i32) -> AppResult<MoodRow> {
        let caller = require_caller(caller)?;
        self.ensure_user(caller).await?;

        let updated = self
            .client
            .from("moods")
            .eq("user_id", caller.id)
            .eq("day", day)
            .update::<_, MoodRow>(&json!({ "mood": mood }))
            .await?;
        tracing::debug!(caller_id = caller.id, %day, rows = updated.len(), "Mood update");
        if let Some(row) = updated.into_iter().next() {
            return Ok(row);
        }

        let inserted = self
            .client
            .from("moods")
            .insert::<_, MoodRow>(&json!({ "user_id": caller.id, "day": day, "mood": mood }))
            .await?;
        tracing::debug!(caller_id = caller.id, %day, rows = inserted.len(), "Mood insert");
        Self::first(inserted, "mood")
    }

    async fn set_reflection(
        &self,
        caller: Option<&Caller>,
        day: NaiveDate,
        text: &str,
    ) -> AppResult<ReflectionRow> {
        let caller = require_caller(caller)?;
        self.ensure_user(caller).await?;
        let text = text.trim();

        let updated = self
            .client
            .from("reflections")
            .eq("user_id", caller.id)
            .eq("day", day)
            .update::<_, ReflectionRow>(&json!({ "text": text }))
            .await?;
        tracing::debug!(caller_id = caller.id, %day, rows = updated.len(), "Reflection update");
        if let Some(row) = updated.into_iter().next() {
            return Ok(row);
        }

        let inserted = self
            .client
            .from("reflections")
            .insert::<_, ReflectionRow>(&json!({ "user_id": caller.id, "day": day, "text": text }))
            .await?;
        tracing::debug!(caller_id = caller.id, %day, rows = inserted.len(), "Reflection insert");
        Self::first(inserted, "reflection")
    }

    async fn history(&self, caller: Option<&Caller>, today: NaiveDate) -> AppResult<Vec<HistoryEntry>> {
        let caller = require_caller(caller)?;
        let since = today - Duration::days(HISTORY_LOOKBACK_DAYS);

        let rows = |table: &'static str| {
            self.client
                .from(table)
                .select("*")
                .eq("user_id", caller.id)
                .gte("day", since)
                .order("day", false)
                .limit(HISTORY_ROW_LIMIT)
                .fetch::<Row>()
        };

        let (moods, reflections) = try_join(rows("moods"), rows("reflections")).await?;
        Ok(build_history(today, &moods, &reflections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn caller(id: i64) -> Caller {
        Caller {
            id,
            username: Some(format!("user{}", id)),
            first_name: None,
            last_name: None,
        }
    }

    fn repo_for(server: &mockito::ServerGuard) -> HostedRepository {
        HostedRepository::new(&server.url(), "service-key").unwrap()
    }

    fn q(key: &str, value: &str) -> Matcher {
        Matcher::UrlEncoded(key.into(), value.into())
    }

    async fn mock_user_upsert(server: &mut mockito::ServerGuard, id: i64) -> mockito::Mock {
        server
            .mock("POST", "/rest/v1/users")
            .match_query(q("on_conflict", "id"))
            .match_header("prefer", Matcher::Regex("resolution=merge-duplicates".into()))
            .match_body(Matcher::PartialJson(json!({ "id": id })))
            .with_status(201)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_every_operation_requires_a_caller() {
        let server = mockito::Server::new_async().await;
        let repo = repo_for(&server);
        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();

        assert!(matches!(repo.today(None, day).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.add_task(None, day, "x").await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.toggle_task(None, 1).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.delete_task(None, 1).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.list_ideas(None).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.add_idea(None, "x").await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.delete_idea(None, 1).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.set_mood(None, day, 3).await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.set_reflection(None, day, "x").await, Err(AppError::Unauthorized)));
        assert!(matches!(repo.history(None, day).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.add_idea(Some(&caller(1)), "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_task_upserts_user_then_inserts() {
        let mut server = mockito::Server::new_async().await;
        let user = mock_user_upsert(&mut server, 42).await;
        let insert = server
            .mock("POST", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .match_header("apikey", "service-key")
            .match_header("authorization", "Bearer service-key")
            .match_body(Matcher::PartialJson(json!({
                "user_id": 42,
                "day": "2026-05-04",
                "text": "ship v1",
                "completed": false,
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "id": 9,
                    "user_id": 42,
                    "day": "2026-05-04",
                    "text": "ship v1",
                    "completed": false,
                    "created_at": "2026-05-04T09:30:00.123456+00:00",
                }])
                .to_string(),
            )
            .create_async()
            .await;
        let repo = repo_for(&server);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let task = repo.add_task(Some(&caller(42)), day, "  ship v1 ").await.unwrap();
        assert_eq!(task.id, 9);
        assert_eq!(task.user_id, Some(42));
        assert!(!task.completed);

        user.assert_async().await;
        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_toggle_missing_task_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(q("id", "eq.7"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.toggle_task(Some(&caller(1)), 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", "/rest/v1/tasks")
            .match_query(Matcher::AllOf(vec![q("id", "eq.11"), q("select", "user_id")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.delete_task(Some(&caller(1)), 11).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Task not found"));
        lookup.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_missing_idea_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", "/rest/v1/ideas")
            .match_query(Matcher::AllOf(vec![q("id", "eq.12"), q("select", "user_id")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/v1/ideas")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.delete_idea(Some(&caller(1)), 12).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Idea not found"));
        lookup.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_toggle_other_users_task_is_forbidden() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(q("id", "eq.7"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": 1, "completed": false}]"#)
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.toggle_task(Some(&caller(2)), 7).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_toggle_own_task_flips_value() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(q("id", "eq.7"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": 1, "completed": true}]"#)
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/rest/v1/tasks")
            .match_query(q("id", "eq.7"))
            .match_body(Matcher::Json(json!({ "completed": false })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let repo = repo_for(&server);

        assert!(!repo.toggle_task(Some(&caller(1)), 7).await.unwrap());
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_idea_owned_by_other_caller_is_forbidden() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/ideas")
            .match_query(Matcher::AllOf(vec![q("id", "eq.3"), q("select", "user_id")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": 100}]"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/v1/ideas")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let err = repo.delete_idea(Some(&caller(200)), 3).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_own_task() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(q("id", "eq.5"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": 1}]"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/v1/tasks")
            .match_query(q("id", "eq.5"))
            .with_status(204)
            .create_async()
            .await;
        let repo = repo_for(&server);

        repo.delete_task(Some(&caller(1)), 5).await.unwrap();
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_ideas_is_scoped_to_caller() {
        let mut server = mockito::Server::new_async().await;
        let scoped = server
            .mock("GET", "/rest/v1/ideas")
            .match_query(Matcher::AllOf(vec![
                q("user_id", "eq.2"),
                q("order", "created_at.desc"),
                q("limit", "50"),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let repo = repo_for(&server);

        assert!(repo.list_ideas(Some(&caller(2))).await.unwrap().is_empty());
        scoped.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_mood_updates_existing_row() {
        let mut server = mockito::Server::new_async().await;
        mock_user_upsert(&mut server, 1).await;
        let patch = server
            .mock("PATCH", "/rest/v1/moods")
            .match_query(Matcher::AllOf(vec![q("user_id", "eq.1"), q("day", "eq.2026-05-04")]))
            .match_body(Matcher::Json(json!({ "mood": 4 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "user_id": 1, "day": "2026-05-04", "mood": 4}]"#)
            .create_async()
            .await;
        let insert = server
            .mock("POST", "/rest/v1/moods")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let row = repo.set_mood(Some(&caller(1)), day, 4).await.unwrap();
        assert_eq!(row.mood, 4);
        patch.assert_async().await;
        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_mood_inserts_when_update_touches_nothing() {
        let mut server = mockito::Server::new_async().await;
        mock_user_upsert(&mut server, 1).await;
        let patch = server
            .mock("PATCH", "/rest/v1/moods")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let insert = server
            .mock("POST", "/rest/v1/moods")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({ "user_id": 1, "day": "2026-05-04", "mood": 2 })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": 1, "day": "2026-05-04", "mood": 2}]"#)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let row = repo.set_mood(Some(&caller(1)), day, 2).await.unwrap();
        assert_eq!(row.user_id, Some(1));
        assert_eq!(row.mood, 2);
        patch.assert_async().await;
        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_reflection_duplicate_key_surfaces_as_backend_error() {
        let mut server = mockito::Server::new_async().await;
        mock_user_upsert(&mut server, 1).await;
        server
            .mock("PATCH", "/rest/v1/reflections")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let insert = server
            .mock("POST", "/rest/v1/reflections")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "text": "tired" })))
            .with_status(409)
            .with_body(r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#)
            .expect(1)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let err = repo.set_reflection(Some(&caller(1)), day, " tired ").await.unwrap_err();
        assert!(matches!(err, AppError::Hosted(_)));
        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_today_bundle() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(Matcher::AllOf(vec![q("user_id", "eq.1"), q("day", "eq.2026-05-04")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 2, "user_id": 1, "day": "2026-05-04", "text": "b", "completed": true, "created_at": "2026-05-04T10:00:00+00:00"},
                    {"id": 1, "user_id": 1, "day": "2026-05-04", "text": "a", "completed": false, "created_at": "2026-05-04T09:00:00+00:00"}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/moods")
            .match_query(q("user_id", "eq.1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"mood": 3}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/reflections")
            .match_query(q("user_id", "eq.1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let repo = repo_for(&server);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let bundle = repo.today(Some(&caller(1)), day).await.unwrap();
        assert_eq!(bundle.tasks.len(), 2);
        assert_eq!(bundle.tasks[0].id, 2);
        assert!(bundle.tasks[0].completed);
        assert_eq!(bundle.mood, Some(3));
        assert_eq!(bundle.reflection, None);
    }

    #[tokio::test]
    async fn test_history_normalizes_rows() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/moods")
            .match_query(Matcher::AllOf(vec![
                q("user_id", "eq.1"),
                q("day", "gte.2026-04-04"),
                q("limit", "500"),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"day": "2026-05-04", "mood": 4}, {"created_at": "2026-05-01 08:00:00", "mood": 2}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/reflections")
            .match_query(q("user_id", "eq.1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"day": "2026-05-03", "text": "quiet"}]"#)
            .create_async()
            .await;
        let repo = repo_for(&server);

        let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let history = repo.history(Some(&caller(1)), today).await.unwrap();
        assert_eq!(history.len(), 7);
        assert_eq!(history[6].mood, Some(4));
        assert_eq!(history[5].highlight.as_deref(), Some("quiet"));
        assert_eq!(history[3].mood, Some(2));
        assert_eq!(history[0].highlight.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_backend_error_status_maps_to_hosted_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/ideas")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let repo = repo_for(&server);

        assert!(matches!(repo.list_ideas(Some(&caller(1))).await, Err(AppError::Hosted(_))));
    }
}
