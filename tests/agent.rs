use std::sync::Arc;

use serde_json::json;
use studypath::server::models::assignment::{Actor, AssignedTask};
use studypath::server::models::project::CreateProject;
use studypath::server::models::task::CreateTask;
use studypath::server::services::agent::{AgentStatus, LearningAgent};
use studypath::server::services::gemini::GeminiService;
use studypath::server::services::store::{
    AgentProfileStore, AssignmentStore, GoalStore, ProjectStore, Stores, TaskStore,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "user_1";

struct Fixture {
    stores: Stores,
    project_id: String,
    task_ids: Vec<String>,
}

/// Seeds a project with three tasks and a goal list for `USER`.
async fn seed_stores() -> Fixture {
    let stores = Stores::in_memory();

    let project = stores
        .projects
        .create(CreateProject {
            name: "Learning Path".to_string(),
            description: Some("Curated AI/ML track".to_string()),
            status: "active".to_string(),
        })
        .await
        .unwrap();

    let mut task_ids = Vec::new();
    for (title, description) in [
        ("Intro", "Python basics"),
        ("Basics", "Data wrangling"),
        ("Advanced", "Model deployment"),
    ] {
        let task = stores
            .tasks
            .create(CreateTask {
                project_id: project.id.clone(),
                title: title.to_string(),
                description: Some(description.to_string()),
                status: "pending".to_string(),
            })
            .await
            .unwrap();
        task_ids.push(task.id);
    }

    stores
        .goals
        .replace(USER, vec!["Become an ML engineer".to_string()])
        .await
        .unwrap();

    Fixture {
        stores,
        project_id: project.id,
        task_ids,
    }
}

async fn mock_completion(content: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "test_response",
            "object": "chat.completion",
            "created": 1234567890,
            "model": "gemini-2.0-flash",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }]
        })))
        .mount(&mock_server)
        .await;
    mock_server
}

fn agent_for(fixture: &Fixture, mock_server: &MockServer) -> LearningAgent {
    let llm = GeminiService::with_base_url("test-key".to_string(), mock_server.uri());
    LearningAgent::new(
        fixture.stores.clone(),
        Some(Arc::new(llm)),
        fixture.project_id.clone(),
    )
}

#[tokio::test]
async fn hallucinated_task_reference_is_dropped() {
    let fixture = seed_stores().await;
    let real_id = &fixture.task_ids[0];
    let content = format!(
        "```json\n[{{\"id\":\"{real_id}\",\"title\":\"Intro\"}},{{\"id\":\"t9\",\"title\":\"Fake\"}}]\n```"
    );
    let mock_server = mock_completion(&content).await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent
        .run(USER, Some("Updated the goals. Share the revised tasks."))
        .await;

    assert_eq!(outcome.status, AgentStatus::Success);
    assert_eq!(outcome.tasks.len(), 1);
    assert_eq!(outcome.tasks[0].task_id, *real_id);
    assert_eq!(outcome.tasks[0].task_name, "Intro");
    assert_eq!(outcome.tasks[0].project_id, fixture.project_id);
    assert_eq!(outcome.tasks[0].project_name, "Learning Path");
    assert!(outcome.response_text.contains("Intro"));
}

#[tokio::test]
async fn already_assigned_task_is_filtered_out() {
    let fixture = seed_stores().await;
    let real_id = fixture.task_ids[0].clone();
    fixture
        .stores
        .assignments
        .add_task(USER, AssignedTask::new(real_id.clone(), Actor::User))
        .await
        .unwrap();

    let content = format!("[{{\"id\":\"{real_id}\",\"title\":\"Intro\"}}]");
    let mock_server = mock_completion(&content).await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent.run(USER, Some("share tasks please")).await;

    assert_eq!(outcome.status, AgentStatus::Success);
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn numbered_list_fallback_yields_no_unreconciled_recommendations() {
    let fixture = seed_stores().await;
    let mock_server =
        mock_completion("1. Learn Python\n2. Build an API\n3. Deploy to cloud").await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent
        .run(USER, Some("Updated the goals. Share the revised tasks."))
        .await;

    // Synthetic suggested_task_<n> ids are not in the authoritative set,
    // so the validator drops all of them.
    assert_eq!(outcome.status, AgentStatus::Success);
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn conversational_mode_returns_model_text_unmodified() {
    let fixture = seed_stores().await;
    let reply = "Focus on statistics, Python, and SQL first. What is your timeline?";
    let mock_server = mock_completion(reply).await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent
        .run(USER, Some("What skills do I need for a data science role?"))
        .await;

    assert_eq!(outcome.status, AgentStatus::Success);
    assert_eq!(outcome.response_text, reply);
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn agent_name_update_short_circuits_without_model() {
    let fixture = seed_stores().await;
    // No LLM configured at all: the fast path must not need one.
    let agent = LearningAgent::new(fixture.stores.clone(), None, fixture.project_id.clone());

    let outcome = agent
        .run(USER, Some("Updated the name of the agent to Nova"))
        .await;

    assert_eq!(outcome.status, AgentStatus::Success);
    assert_eq!(
        outcome.response_text,
        "Hello! I'm Nova. How can I help you today?"
    );

    let profile = fixture.stores.agent_profiles.get(USER).await.unwrap().unwrap();
    assert_eq!(profile.agent_name, "Nova");
}

#[tokio::test]
async fn missing_credentials_yield_error_status() {
    let fixture = seed_stores().await;
    let agent = LearningAgent::new(fixture.stores.clone(), None, fixture.project_id.clone());

    let outcome = agent.run(USER, None).await;

    assert_eq!(outcome.status, AgentStatus::Error);
    assert!(outcome.response_text.starts_with("An error occurred"));
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn upstream_model_failure_yields_error_status() {
    let fixture = seed_stores().await;
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent
        .run(USER, Some("Updated the goals. Share the revised tasks."))
        .await;

    assert_eq!(outcome.status, AgentStatus::Error);
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn unparseable_model_output_is_a_degraded_success() {
    let fixture = seed_stores().await;
    let mock_server = mock_completion("I could not come up with a list today.").await;
    let agent = agent_for(&fixture, &mock_server);

    let outcome = agent.run(USER, Some("share tasks")).await;

    assert_eq!(outcome.status, AgentStatus::Success);
    assert!(outcome.tasks.is_empty());
}
