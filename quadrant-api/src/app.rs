/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── GET /                         # Service metadata
/// ├── GET /health                   # Health check
/// └── /tasks
///     ├── GET /                     # All tasks with total count
///     ├── GET /stats                # Aggregate counts
///     ├── GET /search?q=            # Substring search
///     ├── GET /deadlines            # Pending tasks with deadlines
///     ├── GET /quadrant/:quadrant   # Filter by Eisenhower quadrant
///     ├── GET /status/:status       # Filter by completion status
///     └── GET /:task_id             # Single task
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use quadrant_shared::repo::TaskRepository;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The
/// repository is read-only, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// Task store injected behind the repository trait
    pub repo: Arc<dyn TaskRepository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(repo: Arc<dyn TaskRepository>, config: Config) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/stats", get(routes::stats::task_stats))
        .route("/search", get(routes::tasks::search_tasks))
        .route("/deadlines", get(routes::stats::task_deadlines))
        .route("/quadrant/:quadrant", get(routes::tasks::tasks_by_quadrant))
        .route("/status/:status", get(routes::tasks::tasks_by_status))
        .route("/:task_id", get(routes::tasks::get_task));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/", get(routes::root::service_info))
        .route("/health", get(routes::health::health_check))
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
