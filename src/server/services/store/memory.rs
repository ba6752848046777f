//! In-memory store used by the test suites and for credential-free local
//! runs. Mirrors the semantics of the Postgres backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AgentProfileStore, AssignmentStore, ChatStore, GoalStore, ProjectStore, StoreError,
    StoreResult, TaskStore,
};
use crate::server::models::{
    agent_profile::AgentProfile,
    assignment::{AssignedTask, AssignedTaskUpdate, Assignment, TaskComment},
    chat::{ChatRecord, Speaker},
    goal::GoalSet,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskUpdate},
};

#[derive(Default)]
pub struct MemoryStore {
    projects: RwLock<Vec<Project>>,
    tasks: RwLock<Vec<Task>>,
    goals: RwLock<HashMap<String, GoalSet>>,
    assignments: RwLock<HashMap<String, Assignment>>,
    chats: RwLock<Vec<ChatRecord>>,
    agent_profiles: RwLock<HashMap<String, AgentProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, new: CreateProject) -> StoreResult<Project> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            status: new.status,
            created_at: Utc::now(),
        };
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let mut projects = self.projects.read().await.clone();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self.projects.read().await.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, new: CreateTask) -> StoreResult<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            status: new.status,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn by_project(&self, project_id: &str) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, update: TaskUpdate) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        Ok(Some(task.clone()))
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn replace(&self, user_id: &str, goals: Vec<String>) -> StoreResult<GoalSet> {
        let set = GoalSet {
            user_id: user_id.to_string(),
            goals,
            updated_at: Utc::now(),
        };
        self.goals
            .write()
            .await
            .insert(user_id.to_string(), set.clone());
        Ok(set)
    }

    async fn get(&self, user_id: &str) -> StoreResult<Option<GoalSet>> {
        Ok(self.goals.read().await.get(user_id).cloned())
    }

    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<GoalSet>> {
        let goals = self.goals.read().await;
        Ok(goals
            .values()
            .filter(|g| user_id.map_or(true, |u| g.user_id == u))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn get(&self, user_id: &str) -> StoreResult<Option<Assignment>> {
        Ok(self.assignments.read().await.get(user_id).cloned())
    }

    async fn add_task(&self, user_id: &str, task: AssignedTask) -> StoreResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .entry(user_id.to_string())
            .or_insert_with(|| Assignment {
                user_id: user_id.to_string(),
                tasks: Vec::new(),
                updated_at: Utc::now(),
            });
        if assignment.contains_task(&task.task_id) {
            return Err(StoreError::DuplicateAssignment);
        }
        assignment.tasks.push(task);
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        update: AssignedTaskUpdate,
    ) -> StoreResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(user_id)
            .ok_or(StoreError::NotFound("assignment"))?;
        let task = assignment
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(StoreError::NotFound("assigned task"))?;
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        if let Some(sequence) = update.sequence {
            task.sequence = Some(sequence);
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn add_comment(
        &self,
        user_id: &str,
        task_id: &str,
        comment: TaskComment,
    ) -> StoreResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(user_id)
            .ok_or(StoreError::NotFound("assignment"))?;
        let task = assignment
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(StoreError::NotFound("assigned task"))?;
        task.comments.push(comment);
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn append(
        &self,
        user_id: &str,
        user_type: Speaker,
        message: String,
    ) -> StoreResult<ChatRecord> {
        let record = ChatRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_type,
            message,
            timestamp: Utc::now(),
        };
        self.chats.write().await.push(record.clone());
        Ok(record)
    }

    async fn history(&self, user_id: &str) -> StoreResult<Vec<ChatRecord>> {
        let mut records: Vec<ChatRecord> = self
            .chats
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(records)
    }
}

#[async_trait]
impl AgentProfileStore for MemoryStore {
    async fn upsert(&self, user_id: &str, agent_name: String) -> StoreResult<AgentProfile> {
        let profile = AgentProfile {
            user_id: user_id.to_string(),
            agent_name,
        };
        self.agent_profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn get(&self, user_id: &str) -> StoreResult<Option<AgentProfile>> {
        Ok(self.agent_profiles.read().await.get(user_id).cloned())
    }
}
