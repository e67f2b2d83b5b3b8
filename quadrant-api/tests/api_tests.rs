//! HTTP-level tests for the query API
//!
//! Drives the real router against the seeded in-memory repository (ids 1-4,
//! quadrants Q1-Q4, id 4 completed), so no database is needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use quadrant_api::app::{build_router, AppState};
use quadrant_api::config::Config;
use quadrant_shared::repo::MemoryTaskRepository;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let repo = Arc::new(MemoryTaskRepository::seeded());
    build_router(AppState::new(repo, Config::default()))
}

async fn get(path: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, json)
}

#[tokio::test]
async fn test_service_metadata() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Quadrant");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_list_all_tasks() {
    let (status, body) = get("/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_filter_by_each_quadrant() {
    for quadrant in ["Q1", "Q2", "Q3", "Q4"] {
        let (status, body) = get(&format!("/tasks/quadrant/{quadrant}")).await;
        assert_eq!(status, StatusCode::OK);

        let tasks = body["tasks"].as_array().unwrap();
        assert_eq!(body["total"].as_u64().unwrap() as usize, tasks.len());
        assert!(tasks.iter().all(|t| t["quadrant"] == quadrant));
    }
}

#[tokio::test]
async fn test_invalid_quadrant_is_bad_request() {
    for bad in ["Q5", "Q0", "urgent", "1"] {
        let (status, body) = get(&format!("/tasks/quadrant/{bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "quadrant '{bad}'");
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "Quadrant must be one of Q1, Q2, Q3, Q4");
        assert!(body.get("tasks").is_none());
    }
}

#[tokio::test]
async fn test_filter_by_status() {
    let (status, completed) = get("/tasks/status/completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["total"], 1);
    assert!(completed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["completed"] == true && !t["completed_at"].is_null()));

    let (status, pending) = get("/tasks/status/pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["total"], 3);
}

#[tokio::test]
async fn test_invalid_status_is_not_found() {
    let (status, body) = get("/tasks/status/done").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_search_hits_title_and_description() {
    let (status, body) = get("/tasks/search?q=REPORT").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "REPORT");
    assert!(body["total"].as_u64().unwrap() >= 1);

    // 'delegated' only appears in a description
    let (status, body) = get("/tasks/search?q=delegated").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_search_miss_is_not_found() {
    let (status, body) = get("/tasks/search?q=zzzzzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_search_query_too_short() {
    let (status, body) = get("/tasks/search?q=a").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "q");
}

#[tokio::test]
async fn test_get_task_by_id() {
    let (status, body) = get("/tasks/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["quadrant"], "Q1");
}

#[tokio::test]
async fn test_get_missing_task_is_not_found() {
    let (status, body) = get("/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn test_stats_exact_seeded_shape() {
    let (status, body) = get("/tasks/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "total_tasks": 4,
            "by_quadrant": {"Q1": 1, "Q2": 1, "Q3": 1, "Q4": 1},
            "by_status": {"completed": 1, "pending": 3}
        })
    );
}

#[tokio::test]
async fn test_stats_counts_sum_to_total() {
    let (_, body) = get("/tasks/stats").await;
    let total = body["total_tasks"].as_u64().unwrap();

    let quadrant_sum: u64 = body["by_quadrant"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    let status_sum: u64 = body["by_status"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();

    assert_eq!(quadrant_sum, total);
    assert_eq!(status_sum, total);
}

#[tokio::test]
async fn test_deadlines_soonest_first() {
    let (status, body) = get("/tasks/deadlines").await;
    assert_eq!(status, StatusCode::OK);

    // Seeded tasks 1 and 3 are pending with deadlines; task 4 is completed
    // and task 2 has none.
    assert_eq!(body["total"], 2);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[1]["id"], 3);
    assert!(
        tasks[0]["days_until_deadline"].as_i64().unwrap()
            <= tasks[1]["days_until_deadline"].as_i64().unwrap()
    );
}
