use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::task::{CreateTask, Task, TaskUpdate};
use crate::server::services::store::{AssignmentStore, TaskStore};

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    let task = state
        .stores
        .tasks
        .create(request)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, (StatusCode, String)> {
    let task = state
        .stores
        .tasks
        .update(&task_id, update)
        .await
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Task not found".to_string()))?;
    Ok(Json(task))
}

/// Tasks joined through the user's assignment, in assignment order. Task
/// ids that no longer resolve are skipped.
pub async fn user_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let assignment = state
        .stores
        .assignments
        .get(&user_id)
        .await
        .map_err(store_error)?;

    let mut tasks = Vec::new();
    if let Some(assignment) = assignment {
        for assigned in &assignment.tasks {
            if let Some(task) = state
                .stores
                .tasks
                .get(&assigned.task_id)
                .await
                .map_err(store_error)?
            {
                tasks.push(task);
            }
        }
    }
    Ok(Json(tasks))
}
