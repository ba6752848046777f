//! The learning agent orchestrator: classifies the inbound message, drives
//! the external data fetches and the model call, and pushes the model's raw
//! output through the Parser -> Validator -> Duplicate Filter -> Enricher
//! pipeline.

pub mod mode;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod tools;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::server::models::{
    agent_profile::DEFAULT_AGENT_NAME, chat::TaskRecommendation, project::Project,
};
use crate::server::services::gemini::GeminiService;
use crate::server::services::store::{
    AgentProfileStore, AssignmentStore, GoalStore, ProjectStore, Stores, TaskStore,
};

use mode::{agent_name_update, classify, AgentMode};
use tools::{toolset, AgentToolbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Success,
    Error,
}

/// What an agent invocation always produces. System-level failures surface
/// as `status: error` with a readable message; a run that simply found no
/// new tasks is still a success.
#[derive(Debug, Serialize)]
pub struct AgentOutcome {
    pub response_text: String,
    pub status: AgentStatus,
    pub tasks: Vec<TaskRecommendation>,
}

impl AgentOutcome {
    fn success(response_text: String, tasks: Vec<TaskRecommendation>) -> Self {
        Self {
            response_text,
            status: AgentStatus::Success,
            tasks,
        }
    }
}

pub struct LearningAgent {
    stores: Stores,
    llm: Option<Arc<GeminiService>>,
    project_id: String,
}

impl LearningAgent {
    pub fn new(stores: Stores, llm: Option<Arc<GeminiService>>, project_id: String) -> Self {
        Self {
            stores,
            llm,
            project_id,
        }
    }

    /// Runs the agent for one user. Never returns an error: every failure
    /// is folded into an error-status outcome.
    pub async fn run(&self, user_id: &str, message: Option<&str>) -> AgentOutcome {
        info!(user_id, ?message, "running learning agent");
        match self.run_inner(user_id, message).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(user_id, "agent run failed: {err:#}");
                AgentOutcome {
                    response_text: format!("An error occurred: {err}"),
                    status: AgentStatus::Error,
                    tasks: Vec::new(),
                }
            }
        }
    }

    async fn run_inner(&self, user_id: &str, message: Option<&str>) -> Result<AgentOutcome> {
        // Agent-name updates are handled without a model call.
        if let Some(name) = message.and_then(agent_name_update) {
            self.stores
                .agent_profiles
                .upsert(user_id, name.to_string())
                .await?;
            return Ok(AgentOutcome::success(
                format!("Hello! I'm {name}. How can I help you today?"),
                Vec::new(),
            ));
        }

        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| anyhow!("model credentials are not configured"))?;

        let agent_name = self
            .stores
            .agent_profiles
            .get(user_id)
            .await?
            .map(|p| p.agent_name)
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());

        let mode = classify(message);
        let toolbox = AgentToolbox::new(self.stores.clone(), self.project_id.clone());

        match mode {
            AgentMode::Conversational => {
                info!(user_id, "mode: conversational");
                let response_text = llm
                    .chat_with_tools(
                        &prompts::conversational_system(&agent_name),
                        &prompts::conversational_user(user_id, message),
                        toolset(mode),
                        &toolbox,
                    )
                    .await?;
                Ok(AgentOutcome::success(response_text, Vec::new()))
            }
            AgentMode::TaskAssignment => {
                info!(user_id, "mode: task assignment");
                let goals = self
                    .stores
                    .goals
                    .get(user_id)
                    .await?
                    .map(|set| set.goals)
                    .unwrap_or_default();
                let assignment = self.stores.assignments.get(user_id).await?;
                let assigned_ids = assignment
                    .as_ref()
                    .map(|a| a.task_ids())
                    .unwrap_or_default();
                let project = self.target_project().await?;
                let pool_tasks = self.stores.tasks.by_project(&project.id).await?;

                let raw = llm
                    .chat_with_tools(
                        &prompts::task_assignment_system(&agent_name),
                        &prompts::task_assignment_user(
                            user_id,
                            &goals,
                            &pool_tasks,
                            &assigned_ids,
                        ),
                        toolset(mode),
                        &toolbox,
                    )
                    .await?;

                let candidates = parser::parse_model_tasks(&raw);

                // Re-fetched at validation time; the model's own tool calls
                // cannot be trusted as the authoritative set. A store failure
                // here fails closed.
                let authoritative: HashSet<String> = self
                    .stores
                    .tasks
                    .by_project(&project.id)
                    .await?
                    .into_iter()
                    .map(|t| t.id)
                    .collect();

                let valid = pipeline::validate(candidates, &authoritative);
                let fresh = pipeline::filter_assigned(valid, assignment.as_ref());
                let recommendations = pipeline::enrich(fresh, &project.id, &project.name);

                let response_text = summarize(&recommendations);
                Ok(AgentOutcome::success(response_text, recommendations))
            }
        }
    }

    async fn target_project(&self) -> Result<Project> {
        self.stores
            .projects
            .get(&self.project_id)
            .await?
            .ok_or_else(|| anyhow!("target project {} not found", self.project_id))
    }
}

fn summarize(recommendations: &[TaskRecommendation]) -> String {
    if recommendations.is_empty() {
        return "I reviewed the project tasks against your goals but found no new tasks \
                to recommend right now."
            .to_string();
    }
    let lines: Vec<String> = recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| format!("{}. {}", i + 1, rec.task_name))
        .collect();
    format!(
        "Based on your updated goals, here is your revised learning path:\n{}",
        lines.join("\n")
    )
}
