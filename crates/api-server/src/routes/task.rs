//! Task API endpoints
//!
//! Each handler relays one list-screen action to the presenter.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskapp_core::presenter::TaskRow;
use taskapp_core::task::{Task, TaskRepository};
use taskapp_core::Error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Exact category to search for; an empty value clears the search
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub date: String,
    pub category: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            contents: task.contents,
            date: task.date.to_rfc3339(),
            category: task.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::TaskNotFound(_) => StatusCode::NOT_FOUND,
        Error::DuplicateId(_) => StatusCode::CONFLICT,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tasks - List tasks by date, optionally searching by category
async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let presenter = state.presenter();
    let tasks = match query.category {
        Some(category) => presenter.on_search_submitted(&category).await,
        None => presenter.on_list_displayed().await,
    }
    .map_err(error_response)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/tasks/rows - Rendered rows of the current listing
async fn list_rows(State(state): State<AppState>) -> Json<Vec<TaskRow>> {
    Json(state.presenter().rows().await)
}

/// POST /api/tasks/drafts - Start a new task
async fn create_draft(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let draft = state
        .presenter()
        .on_create_requested()
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(draft))))
}

/// DELETE /api/tasks/drafts/:id - Abandon an unsaved draft
async fn discard_draft(State(state): State<AppState>, Path(id): Path<i64>) -> StatusCode {
    if state.presenter().on_draft_discarded(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /api/tasks/:id - Load a task for editing
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .presenter()
        .on_row_selected(id)
        .await
        .map_err(error_response)?;

    Ok(Json(TaskResponse::from(task)))
}

/// PUT /api/tasks/:id - Save a draft or an edited task
async fn save_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaveTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let presenter = state.presenter();

    // Unset dates keep the draft's creation time or the stored date.
    let date = match req.date {
        Some(date) => date,
        None => match presenter.draft(id).await {
            Some(draft) => draft.date,
            None => presenter
                .store()
                .get(id)
                .await
                .map_err(error_response)?
                .map(|existing| existing.date)
                .unwrap_or_else(Utc::now),
        },
    };

    let task = Task::new(id)
        .with_title(req.title)
        .with_contents(req.contents)
        .with_category(req.category)
        .with_date(date);

    let saved = presenter
        .on_edit_confirmed(task)
        .await
        .map_err(error_response)?;

    Ok(Json(TaskResponse::from(saved)))
}

/// DELETE /api/tasks/:id - Delete a task and cancel its reminder
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let removed = state
        .presenter()
        .on_delete_confirmed(id)
        .await
        .map_err(error_response)?;

    Ok(Json(TaskResponse::from(removed)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks/rows", get(list_rows))
        .route("/api/tasks/drafts", post(create_draft))
        .route("/api/tasks/drafts/{id}", delete(discard_draft))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(save_task).delete(delete_task),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::{json, Value};
    use taskapp_core::reminder::ReminderEvent;
    use taskapp_core::task::FileTaskStore;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn build_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTaskStore::new(temp_dir.path().join("tasks.json"))
            .await
            .unwrap();
        (AppState::with_store(Arc::new(store)), temp_dir)
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, payload)
    }

    async fn save(state: &AppState, title: &str, category: &str, date: &str) -> i64 {
        let (status, draft) = send(state, "POST", "/api/tasks/drafts", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = draft["id"].as_i64().unwrap();

        let (status, _) = send(
            state,
            "PUT",
            &format!("/api/tasks/{}", id),
            Some(json!({ "title": title, "category": category, "date": date })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    #[tokio::test]
    async fn draft_then_save_lists_sorted_tasks() {
        let (state, _temp) = build_state().await;
        let a = save(&state, "A", "work", "2024-01-02T00:00:00Z").await;
        let b = save(&state, "B", "home", "2024-01-01T00:00:00Z").await;
        assert_eq!((a, b), (0, 1));

        let (status, payload) = send(&state, "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn category_search_and_clear() {
        let (state, _temp) = build_state().await;
        save(&state, "A", "work", "2024-01-02T00:00:00Z").await;
        save(&state, "B", "home", "2024-01-01T00:00:00Z").await;

        let (_, work) = send(&state, "GET", "/api/tasks?category=work", None).await;
        assert_eq!(work.as_array().unwrap().len(), 1);
        assert_eq!(work[0]["title"], "A");

        let (_, rows) = send(&state, "GET", "/api/tasks/rows", None).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);

        let (_, cleared) = send(&state, "GET", "/api/tasks?category=", None).await;
        assert_eq!(cleared.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_cancels_reminder_and_missing_is_not_found() {
        let (state, _temp) = build_state().await;
        let a = save(&state, "A", "work", "2024-01-02T00:00:00Z").await;

        let mut rx = state.task_store().subscribe();
        let (status, removed) = send(&state, "DELETE", &format!("/api/tasks/{}", a), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["id"], a);
        assert_eq!(rx.try_recv().unwrap(), ReminderEvent::cancel(a));

        let (status, payload) = send(&state, "DELETE", &format!("/api/tasks/{}", a), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(payload["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn saving_unknown_task_is_not_found() {
        let (state, _temp) = build_state().await;
        let (status, _) = send(&state, "PUT", "/api/tasks/5", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&state, "GET", "/api/tasks/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_keeps_date_when_omitted() {
        let (state, _temp) = build_state().await;
        let id = save(&state, "A", "", "2024-01-02T03:04:00Z").await;

        let (status, edited) = send(
            &state,
            "PUT",
            &format!("/api/tasks/{}", id),
            Some(json!({ "title": "A2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["title"], "A2");

        let stored = state.task_store().get(id).await.unwrap().unwrap();
        assert_eq!(stored.date.to_rfc3339(), "2024-01-02T03:04:00+00:00");
    }

    #[tokio::test]
    async fn discarding_draft_frees_it() {
        let (state, _temp) = build_state().await;
        let (_, draft) = send(&state, "POST", "/api/tasks/drafts", None).await;
        let id = draft["id"].as_i64().unwrap();

        let uri = format!("/api/tasks/drafts/{}", id);
        let (status, _) = send(&state, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&state, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn saving_draft_without_date_keeps_draft_date() {
        let (state, _temp) = build_state().await;
        let (_, draft) = send(&state, "POST", "/api/tasks/drafts", None).await;
        let id = draft["id"].as_i64().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (status, saved) = send(
            &state,
            "PUT",
            &format!("/api/tasks/{}", id),
            Some(json!({ "title": "no date" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["date"], draft["date"]);
    }
}
