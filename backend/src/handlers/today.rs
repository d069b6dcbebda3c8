use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::handlers::{caller_of, MaybeCaller};
use crate::models::{journal::TodayBundle, today};
use crate::AppState;

pub async fn get_today(
    State(state): State<AppState>,
    caller: MaybeCaller,
) -> AppResult<Json<TodayBundle>> {
    let bundle = state.repo.today(caller_of(&caller), today()).await?;
    Ok(Json(bundle))
}
