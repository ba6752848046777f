use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::assignment::{
    AssignTaskRequest, AssignedTask, AssignedTaskUpdate, Assignment, NewComment, TaskComment,
};
use crate::server::services::store::{AssignmentStore, TaskStore};

pub async fn get_assignment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Assignment>, (StatusCode, String)> {
    let assignment = state
        .stores
        .assignments
        .get(&user_id)
        .await
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Assignment not found".to_string()))?;
    Ok(Json(assignment))
}

/// Set-like append: a task already present in the user's assignment is a
/// 409, an unknown task id a 404.
pub async fn assign_task(
    State(state): State<AppState>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<(StatusCode, Json<Assignment>), (StatusCode, String)> {
    state
        .stores
        .tasks
        .get(&request.task_id)
        .await
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Task not found".to_string()))?;

    let assignment = state
        .stores
        .assignments
        .add_task(
            &request.user_id,
            AssignedTask::new(request.task_id, request.assigned_by),
        )
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn update_assigned_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(update): Json<AssignedTaskUpdate>,
) -> Result<Json<Assignment>, (StatusCode, String)> {
    let assignment = state
        .stores
        .assignments
        .update_task(&user_id, &task_id, update)
        .await
        .map_err(store_error)?;
    Ok(Json(assignment))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(comment): Json<NewComment>,
) -> Result<(StatusCode, Json<Assignment>), (StatusCode, String)> {
    let assignment = state
        .stores
        .assignments
        .add_comment(
            &user_id,
            &task_id,
            TaskComment {
                author: comment.author,
                text: comment.text,
                timestamp: Utc::now(),
            },
        )
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}
