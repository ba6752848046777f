use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::server::{
    handlers::{
        agents::{get_profile, upsert_profile},
        assignments::{add_comment, assign_task, get_assignment, update_assigned_task},
        chat::{chat_history, chat_with_agent},
        goals::{get_goals, list_goals, set_goals},
        health::health,
        projects::{create_project, get_project, list_projects, project_stats},
        tasks::{create_task, update_task, user_tasks},
    },
    services::{agent::LearningAgent, gemini::GeminiService, store::Stores},
};

/// The project whose task pool feeds the agent's recommendations.
pub const DEFAULT_TARGET_PROJECT_ID: &str = "695caa41c485455f397017ae";

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub agent: Arc<LearningAgent>,
}

pub fn configure_app(
    stores: Stores,
    llm: Option<Arc<GeminiService>>,
    target_project_id: String,
) -> Router {
    let agent = Arc::new(LearningAgent::new(
        stores.clone(),
        llm,
        target_project_id,
    ));

    let state = AppState { stores, agent };
    app_router(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/goals", get(list_goals).post(set_goals))
        .route("/goals/:user_id", get(get_goals))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/:project_id", get(get_project))
        .route("/projects/:project_id/stats", get(project_stats))
        .route("/tasks", post(create_task))
        .route("/tasks/:task_id", put(update_task))
        .route("/tasks/user/:user_id", get(user_tasks))
        .route("/assignments", post(assign_task))
        .route("/assignments/:user_id", get(get_assignment))
        .route(
            "/assignments/:user_id/tasks/:task_id",
            put(update_assigned_task),
        )
        .route(
            "/assignments/:user_id/tasks/:task_id/comments",
            post(add_comment),
        )
        .route("/agents", post(upsert_profile))
        .route("/agents/:user_id", get(get_profile))
        .route("/chat/agent", post(chat_with_agent))
        .route("/chat/history/:user_id", get(chat_history))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
