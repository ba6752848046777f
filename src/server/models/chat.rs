use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Agent => "agent",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "agent" => Speaker::Agent,
            _ => Speaker::User,
        }
    }
}

/// Append-only log entry; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRecord {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userType")]
    pub user_type: Speaker,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A validated, enriched task recommendation ready for client display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecommendation {
    pub task_id: String,
    pub task_name: String,
    pub project_id: String,
    pub project_name: String,
}
