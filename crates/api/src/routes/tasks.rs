//! Route exposing recent background task statuses.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use tendermill_core::task::TaskReport;

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tasks))
}

#[derive(Serialize)]
struct TaskListResponse {
    tasks: Vec<TaskReport>,
}

/// GET /api/v1/tasks
///
/// Recently spawned background tasks (webhook fan-outs, synthesizers)
/// with their current status, oldest first.
async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<TaskListResponse>> {
    Ok(Json(TaskListResponse {
        tasks: state.tasks.snapshot(),
    }))
}
