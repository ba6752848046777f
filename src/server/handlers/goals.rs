use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::goal::{GoalSet, SetGoalsRequest};
use crate::server::services::store::GoalStore;

#[derive(Debug, Deserialize)]
pub struct GoalsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<GoalsQuery>,
) -> Result<Json<Vec<GoalSet>>, (StatusCode, String)> {
    let goals = state
        .stores
        .goals
        .list(query.user_id.as_deref())
        .await
        .map_err(store_error)?;
    Ok(Json(goals))
}

/// Replace-on-set upsert; the previous goal list is discarded wholesale.
pub async fn set_goals(
    State(state): State<AppState>,
    Json(request): Json<SetGoalsRequest>,
) -> Result<(StatusCode, Json<GoalSet>), (StatusCode, String)> {
    let goals = state
        .stores
        .goals
        .replace(&request.user_id, request.goals)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(goals)))
}

pub async fn get_goals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GoalSet>, (StatusCode, String)> {
    let goals = state
        .stores
        .goals
        .get(&user_id)
        .await
        .map_err(store_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            "Goals not found for this user".to_string(),
        ))?;
    Ok(Json(goals))
}
