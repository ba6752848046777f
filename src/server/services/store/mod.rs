//! Document-store seams for the service. The agent and the HTTP handlers
//! only ever see these traits; the backing store is chosen at startup.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::server::models::{
    agent_profile::AgentProfile,
    assignment::{AssignedTask, AssignedTaskUpdate, Assignment, TaskComment},
    chat::{ChatRecord, Speaker},
    goal::GoalSet,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskUpdate},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("task is already assigned to this user")]
    DuplicateAssignment,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, new: CreateProject) -> StoreResult<Project>;
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<Project>>;
    async fn get(&self, id: &str) -> StoreResult<Option<Project>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, new: CreateTask) -> StoreResult<Task>;
    async fn get(&self, id: &str) -> StoreResult<Option<Task>>;
    async fn by_project(&self, project_id: &str) -> StoreResult<Vec<Task>>;
    /// Returns `None` when no task matches `id`.
    async fn update(&self, id: &str, update: TaskUpdate) -> StoreResult<Option<Task>>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Replace-on-set upsert; the previous list is discarded wholesale.
    async fn replace(&self, user_id: &str, goals: Vec<String>) -> StoreResult<GoalSet>;
    async fn get(&self, user_id: &str) -> StoreResult<Option<GoalSet>>;
    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<GoalSet>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn get(&self, user_id: &str) -> StoreResult<Option<Assignment>>;
    /// Set-like append: fails with [`StoreError::DuplicateAssignment`] when
    /// the task id is already present in the user's assignment.
    async fn add_task(&self, user_id: &str, task: AssignedTask) -> StoreResult<Assignment>;
    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        update: AssignedTaskUpdate,
    ) -> StoreResult<Assignment>;
    async fn add_comment(
        &self,
        user_id: &str,
        task_id: &str,
        comment: TaskComment,
    ) -> StoreResult<Assignment>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn append(
        &self,
        user_id: &str,
        user_type: Speaker,
        message: String,
    ) -> StoreResult<ChatRecord>;
    /// Ascending by timestamp.
    async fn history(&self, user_id: &str) -> StoreResult<Vec<ChatRecord>>;
}

#[async_trait]
pub trait AgentProfileStore: Send + Sync {
    async fn upsert(&self, user_id: &str, agent_name: String) -> StoreResult<AgentProfile>;
    async fn get(&self, user_id: &str) -> StoreResult<Option<AgentProfile>>;
}

/// Handle bundle passed into the router and the agent at startup.
#[derive(Clone)]
pub struct Stores {
    pub projects: Arc<dyn ProjectStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub goals: Arc<dyn GoalStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub chats: Arc<dyn ChatStore>,
    pub agent_profiles: Arc<dyn AgentProfileStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            projects: store.clone(),
            tasks: store.clone(),
            goals: store.clone(),
            assignments: store.clone(),
            chats: store.clone(),
            agent_profiles: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            projects: store.clone(),
            tasks: store.clone(),
            goals: store.clone(),
            assignments: store.clone(),
            chats: store.clone(),
            agent_profiles: store,
        }
    }
}
