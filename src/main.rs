use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use studypath::server::config::{configure_app, DEFAULT_TARGET_PROJECT_ID};
use studypath::server::services::{gemini::GeminiService, store::Stores};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();

    let stores = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await
                .expect("Failed to connect to Postgres");
            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");
            Stores::postgres(pool)
        }
        Err(_) => {
            warn!("DATABASE_URL not set, falling back to the in-memory store");
            Stores::in_memory()
        }
    };

    // A missing API key is not fatal here: agent invocations report an
    // error status instead.
    let llm = match GeminiService::from_env() {
        Ok(service) => Some(Arc::new(service)),
        Err(err) => {
            warn!("{err}; agent requests will return an error status");
            None
        }
    };

    let target_project_id = std::env::var("TARGET_PROJECT_ID")
        .unwrap_or_else(|_| DEFAULT_TARGET_PROJECT_ID.to_string());

    let app = configure_app(stores, llm, target_project_id);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("API and agent ready on http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
