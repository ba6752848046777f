pub mod agents;
pub mod assignments;
pub mod chat;
pub mod goals;
pub mod health;
pub mod projects;
pub mod tasks;

use axum::http::StatusCode;
use tracing::error;

use crate::server::services::store::StoreError;

/// Maps store failures onto HTTP statuses; backend failures are logged
/// here so handlers don't repeat themselves.
pub(crate) fn store_error(err: StoreError) -> (StatusCode, String) {
    let status = match &err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::DuplicateAssignment => StatusCode::CONFLICT,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("store operation failed: {err:#}");
    }
    (status, err.to_string())
}
