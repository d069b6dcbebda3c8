//! Persistence for tasks, ideas, moods and reflections.
//!
//! One `Repository` trait, two implementations: [`LocalRepository`] is the
//! single-tenant embedded store, [`HostedRepository`] the multi-tenant remote
//! store. [`open`] picks one at startup and the choice holds for the life of
//! the process.
//!
//! Both variants return the same shapes and the same [`AppError`] taxonomy.
//! Only the hosted variant requires a caller and checks ownership.

pub mod day;
pub mod hosted;
pub mod local;
pub mod postgrest;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::identity::Caller;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::history::HistoryEntry;
use crate::models::idea::Idea;
use crate::models::journal::{MoodRow, ReflectionRow, TodayBundle};
use crate::models::task::Task;

pub use hosted::HostedRepository;
pub use local::LocalRepository;

/// Most ideas returned by a listing.
pub const IDEA_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Local,
    Hosted,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Local => f.write_str("local"),
            StorageMode::Hosted => f.write_str("hosted"),
        }
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    fn mode(&self) -> StorageMode;

    /// Cheap round-trip to the store, used by readiness checks.
    async fn ping(&self) -> AppResult<()>;

    /// Tasks for `day` (newest first) plus that day's mood and reflection.
    async fn today(&self, caller: Option<&Caller>, day: NaiveDate) -> AppResult<TodayBundle>;

    async fn add_task(&self, caller: Option<&Caller>, day: NaiveDate, text: &str) -> AppResult<Task>;

    /// Flip `completed` and return the new value.
    async fn toggle_task(&self, caller: Option<&Caller>, id: i64) -> AppResult<bool>;

    async fn delete_task(&self, caller: Option<&Caller>, id: i64) -> AppResult<()>;

    /// Up to [`IDEA_LIST_LIMIT`] ideas, newest first.
    async fn list_ideas(&self, caller: Option<&Caller>) -> AppResult<Vec<Idea>>;

    async fn add_idea(&self, caller: Option<&Caller>, text: &str) -> AppResult<Idea>;

    async fn delete_idea(&self, caller: Option<&Caller>, id: i64) -> AppResult<()>;

    /// Last write wins for a (caller, day).
    async fn set_mood(&self, caller: Option<&Caller>, day: NaiveDate, mood: i32) -> AppResult<MoodRow>;

    /// Last write wins for a (caller, day). Text is trimmed; empty is allowed.
    async fn set_reflection(
        &self,
        caller: Option<&Caller>,
        day: NaiveDate,
        text: &str,
    ) -> AppResult<ReflectionRow>;

    /// Exactly one entry per day of the window ending `today`, oldest first.
    async fn history(&self, caller: Option<&Caller>, today: NaiveDate) -> AppResult<Vec<HistoryEntry>>;
}

/// Trimmed task or idea body; empty input is a validation failure.
pub fn required_text<'a>(text: &'a str, what: &str) -> AppResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Empty {}", what)));
    }
    Ok(trimmed)
}

/// The caller the hosted store scopes every query to.
pub fn require_caller(caller: Option<&Caller>) -> AppResult<&Caller> {
    caller.ok_or(AppError::Unauthorized)
}

/// Choose the store for this process. The hosted store is used only when it
/// is configured and its client builds; anything else falls back to local.
pub async fn open(config: &Config) -> anyhow::Result<Arc<dyn Repository>> {
    match config.hosted.as_ref() {
        Some(hosted) => match HostedRepository::new(&hosted.url, &hosted.service_key) {
            Ok(repo) => {
                tracing::info!(mode = %StorageMode::Hosted, "Hosted store configured");
                return Ok(Arc::new(repo));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build hosted store client, falling back to local store");
            }
        },
        None => tracing::warn!("Hosted store not configured, falling back to local store"),
    }

    let repo = LocalRepository::open(&config.database_path).await?;
    tracing::info!(mode = %StorageMode::Local, path = %config.database_path, "Local store opened");
    Ok(Arc::new(repo))
}
