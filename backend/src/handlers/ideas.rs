use axum::{extract::State, Json};

use crate::dto::{IdeaCreatedResponse, OkResponse, TextRequest};
use crate::error::AppResult;
use crate::handlers::{caller_of, AppJson, AppPath, MaybeCaller};
use crate::models::idea::Idea;
use crate::AppState;

pub async fn list_ideas(
    State(state): State<AppState>,
    caller: MaybeCaller,
) -> AppResult<Json<Vec<Idea>>> {
    let ideas = state.repo.list_ideas(caller_of(&caller)).await?;
    Ok(Json(ideas))
}

pub async fn create_idea(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppJson(body): AppJson<TextRequest>,
) -> AppResult<Json<IdeaCreatedResponse>> {
    let idea = state.repo.add_idea(caller_of(&caller), body.text()).await?;
    Ok(Json(IdeaCreatedResponse { ok: true, idea }))
}

pub async fn delete_idea(
    State(state): State<AppState>,
    caller: MaybeCaller,
    AppPath(idea_id): AppPath<i64>,
) -> AppResult<Json<OkResponse>> {
    state.repo.delete_idea(caller_of(&caller), idea_id).await?;
    Ok(Json(OkResponse::new()))
}
