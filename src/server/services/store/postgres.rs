//! PostgreSQL backend. Goal lists and assignment sub-records live in JSONB
//! columns; everything else is plain relational.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    AgentProfileStore, AssignmentStore, ChatStore, GoalStore, ProjectStore, StoreError,
    StoreResult, TaskStore,
};
use crate::server::models::{
    agent_profile::AgentProfile,
    assignment::{AssignedTask, AssignedTaskUpdate, Assignment, TaskComment},
    chat::{ChatRecord, Speaker},
    goal::{normalize_goals, GoalSet},
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskUpdate},
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_assignment(&self, user_id: &str) -> StoreResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, (String, serde_json::Value, DateTime<Utc>)>(
            "SELECT user_id, tasks, updated_at FROM assignments WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch assignment")?;

        row.map(|(user_id, tasks, updated_at)| {
            let tasks: Vec<AssignedTask> = serde_json::from_value(tasks)
                .context("assignment document holds malformed task sub-records")?;
            Ok(Assignment {
                user_id,
                tasks,
                updated_at,
            })
        })
        .transpose()
    }

    /// Read-modify-write on the tasks array, keyed by user id. Concurrent
    /// writers for the same user are not expected at this layer.
    async fn write_tasks(
        &self,
        user_id: &str,
        tasks: &[AssignedTask],
    ) -> StoreResult<Assignment> {
        let value = serde_json::to_value(tasks).context("failed to encode task sub-records")?;
        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "UPDATE assignments SET tasks = $2, updated_at = now() WHERE user_id = $1 \
             RETURNING updated_at",
        )
        .bind(user_id)
        .bind(&value)
        .fetch_one(&self.pool)
        .await
        .context("failed to update assignment")?;

        Ok(Assignment {
            user_id: user_id.to_string(),
            tasks: tasks.to_vec(),
            updated_at,
        })
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create(&self, new: CreateProject) -> StoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, name, description, status) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, description, status, created_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.status)
        .fetch_one(&self.pool)
        .await
        .context("failed to create project")?;
        Ok(project)
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, status, created_at FROM projects \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list projects")?;
        Ok(projects)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, status, created_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch project")?;
        Ok(project)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create(&self, new: CreateTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, project_id, title, description, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, project_id, title, description, status",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&new.project_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.status)
        .fetch_one(&self.pool)
        .await
        .context("failed to create task")?;
        Ok(task)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, project_id, title, description, status FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch task")?;
        Ok(task)
    }

    async fn by_project(&self, project_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, project_id, title, description, status FROM tasks \
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list project tasks")?;
        Ok(tasks)
    }

    async fn update(&self, id: &str, update: TaskUpdate) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 status = COALESCE($4, status) \
             WHERE id = $1 \
             RETURNING id, project_id, title, description, status",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.status)
        .fetch_optional(&self.pool)
        .await
        .context("failed to update task")?;
        Ok(task)
    }
}

#[async_trait]
impl GoalStore for PgStore {
    async fn replace(&self, user_id: &str, goals: Vec<String>) -> StoreResult<GoalSet> {
        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO goals (user_id, goals, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (user_id) DO UPDATE SET goals = $2, updated_at = now() \
             RETURNING updated_at",
        )
        .bind(user_id)
        .bind(json!(goals))
        .fetch_one(&self.pool)
        .await
        .context("failed to upsert goals")?;

        Ok(GoalSet {
            user_id: user_id.to_string(),
            goals,
            updated_at,
        })
    }

    async fn get(&self, user_id: &str) -> StoreResult<Option<GoalSet>> {
        let row = sqlx::query_as::<_, (String, serde_json::Value, DateTime<Utc>)>(
            "SELECT user_id, goals, updated_at FROM goals WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch goals")?;

        Ok(row.map(|(user_id, goals, updated_at)| GoalSet {
            user_id,
            goals: normalize_goals(&goals),
            updated_at,
        }))
    }

    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<GoalSet>> {
        let rows = sqlx::query_as::<_, (String, serde_json::Value, DateTime<Utc>)>(
            "SELECT user_id, goals, updated_at FROM goals \
             WHERE ($1::text IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list goals")?;

        Ok(rows
            .into_iter()
            .map(|(user_id, goals, updated_at)| GoalSet {
                user_id,
                goals: normalize_goals(&goals),
                updated_at,
            })
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    async fn get(&self, user_id: &str) -> StoreResult<Option<Assignment>> {
        self.fetch_assignment(user_id).await
    }

    async fn add_task(&self, user_id: &str, task: AssignedTask) -> StoreResult<Assignment> {
        sqlx::query(
            "INSERT INTO assignments (user_id, tasks) VALUES ($1, '[]'::jsonb) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("failed to ensure assignment document")?;

        // Set-like array append: the update matches only when no element of
        // the array carries this task id.
        let appended = json!([task]);
        let marker = json!([{ "taskId": task.task_id }]);
        let result = sqlx::query(
            "UPDATE assignments SET tasks = tasks || $2::jsonb, updated_at = now() \
             WHERE user_id = $1 AND NOT tasks @> $3::jsonb",
        )
        .bind(user_id)
        .bind(&appended)
        .bind(&marker)
        .execute(&self.pool)
        .await
        .context("failed to append assignment task")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateAssignment);
        }

        self.fetch_assignment(user_id)
            .await?
            .ok_or(StoreError::NotFound("assignment"))
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        update: AssignedTaskUpdate,
    ) -> StoreResult<Assignment> {
        let assignment = self
            .fetch_assignment(user_id)
            .await?
            .ok_or(StoreError::NotFound("assignment"))?;

        let mut tasks = assignment.tasks;
        let task = tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(StoreError::NotFound("assigned task"))?;
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        if let Some(sequence) = update.sequence {
            task.sequence = Some(sequence);
        }

        self.write_tasks(user_id, &tasks).await
    }

    async fn add_comment(
        &self,
        user_id: &str,
        task_id: &str,
        comment: TaskComment,
    ) -> StoreResult<Assignment> {
        let assignment = self
            .fetch_assignment(user_id)
            .await?
            .ok_or(StoreError::NotFound("assignment"))?;

        let mut tasks = assignment.tasks;
        let task = tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(StoreError::NotFound("assigned task"))?;
        task.comments.push(comment);

        self.write_tasks(user_id, &tasks).await
    }
}

#[async_trait]
impl ChatStore for PgStore {
    async fn append(
        &self,
        user_id: &str,
        user_type: Speaker,
        message: String,
    ) -> StoreResult<ChatRecord> {
        let id = Uuid::new_v4().to_string();
        let timestamp = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO chats (id, user_id, user_type, message) VALUES ($1, $2, $3, $4) \
             RETURNING timestamp",
        )
        .bind(&id)
        .bind(user_id)
        .bind(user_type.as_str())
        .bind(&message)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert chat record")?;

        Ok(ChatRecord {
            id,
            user_id: user_id.to_string(),
            user_type,
            message,
            timestamp,
        })
    }

    async fn history(&self, user_id: &str) -> StoreResult<Vec<ChatRecord>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, DateTime<Utc>)>(
            "SELECT id, user_id, user_type, message, timestamp FROM chats \
             WHERE user_id = $1 ORDER BY timestamp ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch chat history")?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, user_type, message, timestamp)| ChatRecord {
                id,
                user_id,
                user_type: Speaker::from_str_lossy(&user_type),
                message,
                timestamp,
            })
            .collect())
    }
}

#[async_trait]
impl AgentProfileStore for PgStore {
    async fn upsert(&self, user_id: &str, agent_name: String) -> StoreResult<AgentProfile> {
        sqlx::query(
            "INSERT INTO agent_profiles (user_id, agent_name) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET agent_name = $2",
        )
        .bind(user_id)
        .bind(&agent_name)
        .execute(&self.pool)
        .await
        .context("failed to upsert agent profile")?;

        Ok(AgentProfile {
            user_id: user_id.to_string(),
            agent_name,
        })
    }

    async fn get(&self, user_id: &str) -> StoreResult<Option<AgentProfile>> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT user_id, agent_name FROM agent_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch agent profile")?;

        Ok(row.map(|(user_id, agent_name)| AgentProfile {
            user_id,
            agent_name,
        }))
    }
}
