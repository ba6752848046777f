use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::chat::{ChatRecord, Speaker, TaskRecommendation};
use crate::server::services::agent::AgentStatus;
use crate::server::services::store::ChatStore;

#[derive(Debug, Deserialize)]
pub struct AgentChatRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentChatResponse {
    #[serde(flatten)]
    pub record: ChatRecord,
    pub status: AgentStatus,
    pub tasks: Vec<TaskRecommendation>,
}

/// Invoke the learning agent for a user and persist its reply as a chat
/// record. The agent itself never fails this handler; only a chat-store
/// write failure surfaces as a 500.
pub async fn chat_with_agent(
    State(state): State<AppState>,
    Json(request): Json<AgentChatRequest>,
) -> Result<Json<AgentChatResponse>, (StatusCode, String)> {
    info!("agent invoked for user: {}", request.user_id);

    if let Some(message) = &request.message {
        state
            .stores
            .chats
            .append(&request.user_id, Speaker::User, message.clone())
            .await
            .map_err(store_error)?;
    }

    let outcome = state
        .agent
        .run(&request.user_id, request.message.as_deref())
        .await;
    info!("agent completed with status: {:?}", outcome.status);

    let record = state
        .stores
        .chats
        .append(&request.user_id, Speaker::Agent, outcome.response_text)
        .await
        .map_err(store_error)?;

    Ok(Json(AgentChatResponse {
        record,
        status: outcome.status,
        tasks: outcome.tasks,
    }))
}

pub async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ChatRecord>>, (StatusCode, String)> {
    let history = state
        .stores
        .chats
        .history(&user_id)
        .await
        .map_err(store_error)?;
    Ok(Json(history))
}
