use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{MoodSavedResponse, ReflectionSavedResponse, SetMoodRequest, TextRequest};
use crate::error::{AppError, AppResult};
use crate::handlers::{caller_of, AppJson, MaybeCaller};
use crate::models::today;
use crate::AppState;

pub async fn set_mood(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppJson(body): AppJson<SetMoodRequest>,
) -> AppResult<Json<MoodSavedResponse>> {
    body.validate()?;
    let mood = body
        .mood
        .ok_or_else(|| AppError::Validation("Mood is required".into()))?;

    let row = state.repo.set_mood(caller_of(&caller), today(), mood).await?;
    Ok(Json(MoodSavedResponse { ok: true, row }))
}

pub async fn set_reflection(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppJson(body): AppJson<TextRequest>,
) -> AppResult<Json<ReflectionSavedResponse>> {
    let row = state
        .repo
        .set_reflection(caller_of(&caller), today(), body.text())
        .await?;
    Ok(Json(ReflectionSavedResponse { ok: true, row }))
}
