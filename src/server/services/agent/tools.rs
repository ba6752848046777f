//! Data-fetch functions the model may call while composing an answer. The
//! model's internal decision loop is external-library behavior; this module
//! only declares the functions and answers them from the stores.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::mode::AgentMode;
use crate::server::services::gemini::{create_tool, Tool, ToolExecutor};
use crate::server::services::store::{
    AssignmentStore, GoalStore, ProjectStore, Stores, TaskStore,
};

pub struct AgentToolbox {
    stores: Stores,
    project_id: String,
}

impl AgentToolbox {
    pub fn new(stores: Stores, project_id: String) -> Self {
        Self { stores, project_id }
    }
}

#[async_trait]
impl ToolExecutor for AgentToolbox {
    async fn execute(&self, name: &str, arguments: Value) -> anyhow::Result<Value> {
        let user_id = arguments
            .get("userId")
            .and_then(Value::as_str)
            .unwrap_or_default();

        match name {
            "get_user_goals" => {
                let goals = self
                    .stores
                    .goals
                    .get(user_id)
                    .await?
                    .map(|set| set.goals)
                    .unwrap_or_default();
                if goals.is_empty() {
                    Ok(json!({ "goals": [], "message": "No goals set" }))
                } else {
                    Ok(json!({ "goals": goals }))
                }
            }
            "get_project_details" => {
                let project_id = arguments
                    .get("projectId")
                    .and_then(Value::as_str)
                    .unwrap_or(&self.project_id);
                match self.stores.projects.get(project_id).await? {
                    Some(project) => Ok(json!({
                        "id": project.id,
                        "name": project.name,
                        "description": project.description.as_deref().unwrap_or("No description"),
                        "status": project.status,
                    })),
                    None => Ok(json!({ "error": format!("Project {project_id} not found") })),
                }
            }
            "get_project_tasks" => {
                let project_id = arguments
                    .get("projectId")
                    .and_then(Value::as_str)
                    .unwrap_or(&self.project_id);
                let tasks = self.stores.tasks.by_project(project_id).await?;
                Ok(json!(tasks
                    .iter()
                    .map(|t| json!({
                        "id": t.id,
                        "title": t.title,
                        "description": t.description.as_deref().unwrap_or("No description"),
                        "status": t.status,
                    }))
                    .collect::<Vec<_>>()))
            }
            "get_assigned_tasks" => {
                let task_ids = self
                    .stores
                    .assignments
                    .get(user_id)
                    .await?
                    .map(|a| a.task_ids())
                    .unwrap_or_default();
                Ok(json!({ "taskIds": task_ids }))
            }
            other => Ok(json!({ "error": format!("unknown tool {other}") })),
        }
    }
}

fn user_id_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "userId": { "type": "string", "description": "The user identifier" }
        },
        "required": ["userId"]
    })
}

fn project_id_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "projectId": { "type": "string", "description": "The project identifier" }
        },
        "required": ["projectId"]
    })
}

pub fn toolset(mode: AgentMode) -> Vec<Tool> {
    let goals_tool = create_tool(
        "get_user_goals",
        Some("Fetch the learning goals for a specific user.".to_string()),
        user_id_parameters(),
    );

    match mode {
        AgentMode::Conversational => vec![goals_tool],
        AgentMode::TaskAssignment => vec![
            goals_tool,
            create_tool(
                "get_project_details",
                Some("Fetch project details including name, description, and status.".to_string()),
                project_id_parameters(),
            ),
            create_tool(
                "get_project_tasks",
                Some("Fetch all tasks for a specific project.".to_string()),
                project_id_parameters(),
            ),
            create_tool(
                "get_assigned_tasks",
                Some("Fetch the ids of tasks already assigned to a user.".to_string()),
                user_id_parameters(),
            ),
        ],
    }
}
