use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use studypath::configure_app;
use studypath::server::services::gemini::GeminiService;
use studypath::server::services::store::{ProjectStore, Stores, TaskStore};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app() -> Router {
    configure_app(Stores::in_memory(), None, "unused-project".to_string())
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn setting_goals_replaces_the_previous_list() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "POST",
        "/goals",
        Some(json!({ "userId": "u1", "goals": ["Learn Python", "Learn SQL"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &app,
        "POST",
        "/goals",
        Some(json!({ "userId": "u1", "goals": ["Learn Rust"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&app, "GET", "/goals/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goals"], json!(["Learn Rust"]));

    let (status, body) = request(&app, "GET", "/goals?userId=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_goals_return_404() {
    let app = test_app();
    let (status, _) = request(&app, "GET", "/goals/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_lifecycle_with_tasks_and_stats() {
    let app = test_app();

    let (status, project) = request(
        &app,
        "POST",
        "/projects",
        Some(json!({ "name": "Learning Path", "description": "AI/ML track" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["status"], "active");
    let project_id = project["id"].as_str().unwrap().to_string();

    let (status, task) = request(
        &app,
        "POST",
        "/tasks",
        Some(json!({ "project_id": project_id, "title": "Intro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "pending");
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, detail) = request(&app, "GET", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Learning Path");
    assert_eq!(detail["tasks"].as_array().unwrap().len(), 1);

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/tasks/{task_id}"),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "Intro");

    let (status, stats) = request(
        &app,
        "GET",
        &format!("/projects/{project_id}/stats"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_tasks"], 1);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
async fn unknown_project_and_task_return_404() {
    let app = test_app();
    let (status, _) = request(&app, "GET", "/projects/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "PUT",
        "/tasks/nope",
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignment_flow_enforces_uniqueness_and_tracks_state() {
    let app = test_app();

    let (_, project) = request(
        &app,
        "POST",
        "/projects",
        Some(json!({ "name": "Learning Path" })),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();
    let (_, task) = request(
        &app,
        "POST",
        "/tasks",
        Some(json!({ "project_id": project_id, "title": "Intro" })),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Unknown task id is rejected up front.
    let (status, _) = request(
        &app,
        "POST",
        "/assignments",
        Some(json!({ "userId": "u1", "taskId": "bogus" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, assignment) = request(
        &app,
        "POST",
        "/assignments",
        Some(json!({ "userId": "u1", "taskId": task_id, "assignedBy": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["tasks"][0]["taskId"], json!(task_id));
    assert_eq!(assignment["tasks"][0]["assignedBy"], "admin");
    assert_eq!(assignment["tasks"][0]["completed"], false);

    // Second insert of the same task id is a conflict.
    let (status, _) = request(
        &app,
        "POST",
        "/assignments",
        Some(json!({ "userId": "u1", "taskId": task_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, assignment) = request(
        &app,
        "PUT",
        &format!("/assignments/u1/tasks/{task_id}"),
        Some(json!({ "completed": true, "sequence": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assignment["tasks"][0]["completed"], true);
    assert_eq!(assignment["tasks"][0]["sequence"], 2);

    let (status, assignment) = request(
        &app,
        "POST",
        &format!("/assignments/u1/tasks/{task_id}/comments"),
        Some(json!({ "author": "admin", "text": "Nice progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["tasks"][0]["comments"][0]["text"], "Nice progress");
    assert_eq!(assignment["tasks"][0]["comments"][0]["author"], "admin");

    let (status, tasks) = request(&app, "GET", "/tasks/user/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Intro");
}

#[tokio::test]
async fn agent_profile_defaults_and_upserts() {
    let app = test_app();

    let (status, profile) = request(&app, "GET", "/agents/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["agentName"], "Study Buddy");

    let (status, _) = request(
        &app,
        "POST",
        "/agents",
        Some(json!({ "userId": "u1", "agentName": "Nova" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, profile) = request(&app, "GET", "/agents/u1", None).await;
    assert_eq!(profile["agentName"], "Nova");
}

#[tokio::test]
async fn chat_agent_endpoint_persists_history_and_returns_tasks() {
    let stores = Stores::in_memory();

    let project = stores
        .projects
        .create(studypath::server::models::project::CreateProject {
            name: "Learning Path".to_string(),
            description: None,
            status: "active".to_string(),
        })
        .await
        .unwrap();
    let task = stores
        .tasks
        .create(studypath::server::models::task::CreateTask {
            project_id: project.id.clone(),
            title: "Intro".to_string(),
            description: None,
            status: "pending".to_string(),
        })
        .await
        .unwrap();

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": format!("[{{\"id\":\"{}\",\"title\":\"Intro\"}}]", task.id)
                },
                "finish_reason": "stop"
            }]
        })))
        .mount(&mock_server)
        .await;

    let llm = GeminiService::with_base_url("test-key".to_string(), mock_server.uri());
    let app = configure_app(stores, Some(Arc::new(llm)), project.id.clone());

    let (status, body) = request(
        &app,
        "POST",
        "/chat/agent",
        Some(json!({ "userId": "u1", "message": "Updated the goals. Share the revised tasks." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["userType"], "agent");
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["taskId"], json!(task.id));
    assert_eq!(body["tasks"][0]["projectName"], "Learning Path");

    let (status, history) = request(&app, "GET", "/chat/history/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["userType"], "user");
    assert_eq!(records[1]["userType"], "agent");
}

#[tokio::test]
async fn chat_agent_reports_error_status_without_credentials() {
    let app = test_app();
    let (status, body) = request(
        &app,
        "POST",
        "/chat/agent",
        Some(json!({ "userId": "u1" })),
    )
    .await;
    // The handler still answers 200 with a well-formed error outcome.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred"));
    assert_eq!(body["tasks"], json!([]));
}
