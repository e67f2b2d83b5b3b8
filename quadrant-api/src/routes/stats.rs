/// Aggregate statistics endpoints
///
/// # Endpoints
///
/// ```text
/// GET /tasks/stats      # counts per quadrant and per completion status
/// GET /tasks/deadlines  # pending tasks with deadlines, soonest first
/// ```
///
/// # Stats response
///
/// ```json
/// {
///   "total_tasks": 4,
///   "by_quadrant": { "Q1": 1, "Q2": 1, "Q3": 1, "Q4": 1 },
///   "by_status": { "completed": 1, "pending": 3 }
/// }
/// ```
///
/// Quadrant counts sum to the total, as do the status counts; all keys are
/// present even when a bucket is empty.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use quadrant_shared::models::Quadrant;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the full task collection
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Total number of tasks
    pub total_tasks: usize,

    /// Count per Eisenhower quadrant
    pub by_quadrant: QuadrantCounts,

    /// Count per completion status
    pub by_status: StatusCounts,
}

/// Per-quadrant counters, all keys always present
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QuadrantCounts {
    #[serde(rename = "Q1")]
    pub q1: usize,
    #[serde(rename = "Q2")]
    pub q2: usize,
    #[serde(rename = "Q3")]
    pub q3: usize,
    #[serde(rename = "Q4")]
    pub q4: usize,
}

/// Per-status counters
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
}

/// `GET /tasks/stats` - aggregate counts, computed in a single pass
pub async fn task_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let tasks = state.repo.list().await?;

    let mut stats = StatsResponse::default();
    for task in &tasks {
        stats.total_tasks += 1;
        match task.quadrant {
            Quadrant::Q1 => stats.by_quadrant.q1 += 1,
            Quadrant::Q2 => stats.by_quadrant.q2 += 1,
            Quadrant::Q3 => stats.by_quadrant.q3 += 1,
            Quadrant::Q4 => stats.by_quadrant.q4 += 1,
        }
        if task.completed {
            stats.by_status.completed += 1;
        } else {
            stats.by_status.pending += 1;
        }
    }

    Ok(Json(stats))
}

/// A pending task with its deadline countdown
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDeadline {
    /// Task id
    pub id: i32,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// The deadline
    pub deadline_at: DateTime<Utc>,

    /// Whole days until the deadline, negative when overdue
    pub days_until_deadline: i64,
}

/// Deadline overview response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeadlinesResponse {
    /// Number of pending tasks with a deadline
    pub total: usize,

    /// Tasks ordered soonest deadline first
    pub tasks: Vec<TaskDeadline>,
}

/// `GET /tasks/deadlines` - pending tasks that carry a deadline
pub async fn task_deadlines(State(state): State<AppState>) -> ApiResult<Json<DeadlinesResponse>> {
    let now = Utc::now();
    let tasks = state.repo.list().await?;

    let mut deadlines: Vec<TaskDeadline> = tasks
        .into_iter()
        .filter(|t| !t.completed)
        .filter_map(|t| {
            let deadline_at = t.deadline_at?;
            let days_until_deadline = t.days_until_deadline(now)?;
            Some(TaskDeadline {
                id: t.id,
                title: t.title,
                description: t.description,
                deadline_at,
                days_until_deadline,
            })
        })
        .collect();

    deadlines.sort_by_key(|d| d.deadline_at);

    Ok(Json(DeadlinesResponse {
        total: deadlines.len(),
        tasks: deadlines,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialization_shape() {
        let stats = StatsResponse {
            total_tasks: 4,
            by_quadrant: QuadrantCounts {
                q1: 1,
                q2: 1,
                q3: 1,
                q4: 1,
            },
            by_status: StatusCounts {
                completed: 1,
                pending: 3,
            },
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_tasks": 4,
                "by_quadrant": {"Q1": 1, "Q2": 1, "Q3": 1, "Q4": 1},
                "by_status": {"completed": 1, "pending": 3}
            })
        );
    }
}
