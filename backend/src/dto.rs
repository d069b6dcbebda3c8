//! # PM Companion: Request/Response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Request fields are optional at the serde level so that a missing field
//!   reports as a 400 validation failure rather than a body rejection

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::idea::Idea;
use crate::models::journal::{MoodRow, ReflectionRow};
use crate::models::task::Task;

// ============================================================================
// Common
// ============================================================================

/// `{ "ok": true }`
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Body for endpoints that take free text.
#[derive(Debug, Default, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRequest {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// POST /api/tasks
#[derive(Debug, Serialize)]
pub struct TaskCreatedResponse {
    pub ok: bool,
    pub task: Task,
}

/// POST /api/tasks/:id/toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub ok: bool,
    pub completed: bool,
}

// ============================================================================
// Ideas
// ============================================================================

/// POST /api/ideas
#[derive(Debug, Serialize)]
pub struct IdeaCreatedResponse {
    pub ok: bool,
    pub idea: Idea,
}

// ============================================================================
// Mood & reflection
// ============================================================================

/// POST /api/mood
#[derive(Debug, Deserialize, Validate)]
pub struct SetMoodRequest {
    #[serde(default)]
    #[validate(
        required(message = "Mood is required"),
        range(min = 1, max = 5, message = "Mood must be between 1 and 5")
    )]
    pub mood: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MoodSavedResponse {
    pub ok: bool,
    pub row: MoodRow,
}

#[derive(Debug, Serialize)]
pub struct ReflectionSavedResponse {
    pub ok: bool,
    pub row: ReflectionRow,
}
