/// Task query endpoints
///
/// All endpoints are read-only. Invalid route parameters surface as fixed
/// client-facing errors: a bad quadrant label is a 400, an unknown status
/// filter or missing task id is a 404, and a too-short search query is a
/// 422 validation error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use quadrant_shared::models::{Quadrant, StatusFilter, Task};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed message for an unrecognized quadrant label (400)
const INVALID_QUADRANT: &str = "Quadrant must be one of Q1, Q2, Q3, Q4";

/// Fixed message for an unrecognized status filter (404)
const INVALID_STATUS: &str = "Status must be 'completed' or 'pending'";

/// Task list response with its total count
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Number of tasks returned
    pub total: usize,

    /// The tasks
    pub tasks: Vec<Task>,
}

impl TaskListResponse {
    fn new(tasks: Vec<Task>) -> Self {
        Self {
            total: tasks.len(),
            tasks,
        }
    }
}

/// `GET /tasks` - all tasks with a total count
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<TaskListResponse>> {
    let tasks = state.repo.list().await?;
    Ok(Json(TaskListResponse::new(tasks)))
}

/// Quadrant filter response
#[derive(Debug, Serialize, Deserialize)]
pub struct QuadrantTasksResponse {
    /// The requested quadrant
    pub quadrant: Quadrant,

    /// Number of tasks in the quadrant
    pub total: usize,

    /// The tasks
    pub tasks: Vec<Task>,
}

/// `GET /tasks/quadrant/:quadrant` - tasks in one Eisenhower quadrant
///
/// Rejects anything outside `{Q1, Q2, Q3, Q4}` with a 400.
pub async fn tasks_by_quadrant(
    State(state): State<AppState>,
    Path(quadrant): Path<String>,
) -> ApiResult<Json<QuadrantTasksResponse>> {
    let quadrant: Quadrant = quadrant
        .parse()
        .map_err(|_| ApiError::BadRequest(INVALID_QUADRANT.to_string()))?;

    let tasks = state.repo.by_quadrant(quadrant).await?;
    Ok(Json(QuadrantTasksResponse {
        quadrant,
        total: tasks.len(),
        tasks,
    }))
}

/// Status filter response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusTasksResponse {
    /// The requested status filter
    pub status: StatusFilter,

    /// Number of matching tasks
    pub total: usize,

    /// The tasks
    pub tasks: Vec<Task>,
}

/// `GET /tasks/status/:status` - tasks filtered by completion status
///
/// Rejects anything outside `{completed, pending}` with a 404.
pub async fn tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<StatusTasksResponse>> {
    let status: StatusFilter = status
        .parse()
        .map_err(|_| ApiError::NotFound(INVALID_STATUS.to_string()))?;

    let tasks = state.repo.by_status(status).await?;
    Ok(Json(StatusTasksResponse {
        status,
        total: tasks.len(),
        tasks,
    }))
}

/// Search query parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    /// Substring to look for in titles and descriptions
    #[validate(length(min = 2, message = "search query must be at least 2 characters"))]
    pub q: String,
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The search query
    pub query: String,

    /// Number of matching tasks
    pub total: usize,

    /// The tasks
    pub tasks: Vec<Task>,
}

/// `GET /tasks/search?q=` - case-insensitive substring search
///
/// The query must be at least 2 characters (422 otherwise). An empty result
/// set is a 404.
pub async fn search_tasks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    params.validate()?;

    let tasks = state.repo.search(&params.q).await?;
    if tasks.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No tasks matched '{}'",
            params.q
        )));
    }

    Ok(Json(SearchResponse {
        query: params.q,
        total: tasks.len(),
        tasks,
    }))
}

/// `GET /tasks/:task_id` - a single task by id, 404 when absent
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> ApiResult<Json<Task>> {
    let task = state
        .repo
        .find(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_validation() {
        let short = SearchParams { q: "a".to_string() };
        assert!(short.validate().is_err());

        let ok = SearchParams {
            q: "ab".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
