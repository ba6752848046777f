use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::{
    project::{CreateProject, Project},
    task::Task,
};
use crate::server::services::store::{ProjectStore, TaskStore};

#[derive(Debug, Serialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, (StatusCode, String)> {
    let projects = state.stores.projects.list().await.map_err(store_error)?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>), (StatusCode, String)> {
    let project = state
        .stores
        .projects
        .create(request)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectWithTasks>, (StatusCode, String)> {
    let project = state
        .stores
        .projects
        .get(&project_id)
        .await
        .map_err(store_error)?
        .ok_or((StatusCode::NOT_FOUND, "Project not found".to_string()))?;

    let tasks = state
        .stores
        .tasks
        .by_project(&project_id)
        .await
        .map_err(store_error)?;

    Ok(Json(ProjectWithTasks { project, tasks }))
}

pub async fn project_stats(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let tasks = state
        .stores
        .tasks
        .by_project(&project_id)
        .await
        .map_err(store_error)?;

    let count = |status: &str| tasks.iter().filter(|t| t.status == status).count();
    Ok(Json(json!({
        "total_tasks": tasks.len(),
        "completed": count("completed"),
        "pending": count("pending"),
        "in_progress": count("in_progress"),
    })))
}
