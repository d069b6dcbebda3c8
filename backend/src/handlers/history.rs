use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::handlers::{caller_of, MaybeCaller};
use crate::models::{history::HistoryEntry, today};
use crate::AppState;

/// The last seven days, oldest first, one entry per day.
pub async fn get_history(
    State(state): State<AppState>,
    caller: MaybeCaller,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let history = state.repo.history(caller_of(&caller), today()).await?;
    Ok(Json(history))
}
