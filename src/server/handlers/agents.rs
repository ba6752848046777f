use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::store_error;
use crate::server::config::AppState;
use crate::server::models::agent_profile::{AgentProfile, UpsertAgentProfile, DEFAULT_AGENT_NAME};
use crate::server::services::store::AgentProfileStore;

pub async fn upsert_profile(
    State(state): State<AppState>,
    Json(request): Json<UpsertAgentProfile>,
) -> Result<(StatusCode, Json<AgentProfile>), (StatusCode, String)> {
    let profile = state
        .stores
        .agent_profiles
        .upsert(&request.user_id, request.agent_name)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Falls back to the default display name for users who never renamed
/// their agent.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AgentProfile>, (StatusCode, String)> {
    let profile = state
        .stores
        .agent_profiles
        .get(&user_id)
        .await
        .map_err(store_error)?
        .unwrap_or(AgentProfile {
            user_id,
            agent_name: DEFAULT_AGENT_NAME.to_string(),
        });
    Ok(Json(profile))
}
