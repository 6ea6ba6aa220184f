//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use taskapp_core::task::TaskRepository;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    task_count: usize,
    pending_reminders: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, task_count) = match state.task_store().all_tasks_sorted_by_date().await {
        Ok(tasks) => ("ok", tasks.len()),
        Err(_) => ("degraded", 0),
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        task_count,
        pending_reminders: state.reminders().len().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
