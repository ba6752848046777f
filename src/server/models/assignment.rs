use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who performed an assignment-level action (assigning a task, commenting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    User,
    Admin,
}

impl Default for Actor {
    fn default() -> Self {
        Actor::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub author: Actor,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    pub task_id: String,
    pub assigned_by: Actor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
}

impl AssignedTask {
    pub fn new(task_id: impl Into<String>, assigned_by: Actor) -> Self {
        Self {
            task_id: task_id.into(),
            assigned_by,
            sequence: None,
            completed: false,
            comments: Vec::new(),
        }
    }
}

/// One per user. Task ids within `tasks` are unique; the store enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub user_id: String,
    pub tasks: Vec<AssignedTask>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn contains_task(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|t| t.task_id == task_id)
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.task_id.clone()).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub user_id: String,
    pub task_id: String,
    #[serde(default)]
    pub assigned_by: Actor,
}

/// Partial update of one task sub-record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTaskUpdate {
    pub completed: Option<bool>,
    pub sequence: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub author: Actor,
    pub text: String,
}
