use serde::{Deserialize, Serialize};

pub const DEFAULT_AGENT_NAME: &str = "Study Buddy";

/// Per-user display name for the learning agent. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "agentName")]
    pub agent_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertAgentProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "agentName")]
    pub agent_name: String,
}
