use axum::{extract::State, Json};

use crate::dto::{OkResponse, TaskCreatedResponse, TextRequest, ToggleResponse};
use crate::error::AppResult;
use crate::handlers::{caller_of, AppJson, AppPath, MaybeCaller};
use crate::models::today;
use crate::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppJson(body): AppJson<TextRequest>,
) -> AppResult<Json<TaskCreatedResponse>> {
    let task = state
        .repo
        .add_task(caller_of(&caller), today(), body.text())
        .await?;

    Ok(Json(TaskCreatedResponse { ok: true, task }))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppPath(task_id): AppPath<i64>,
) -> AppResult<Json<ToggleResponse>> {
    let completed = state.repo.toggle_task(caller_of(&caller), task_id).await?;
    Ok(Json(ToggleResponse { ok: true, completed }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppPath(task_id): AppPath<i64>,
) -> AppResult<Json<OkResponse>> {
    state.repo.delete_task(caller_of(&caller), task_id).await?;
    Ok(Json(OkResponse::new()))
}
