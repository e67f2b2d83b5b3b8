/// Service metadata endpoint
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// # Response
///
/// ```json
/// {
///   "name": "Quadrant",
///   "description": "Task management API built on the Eisenhower decision matrix",
///   "version": "0.1.0",
///   "author": "Artem Koval"
/// }
/// ```

use axum::Json;
use serde::{Deserialize, Serialize};

/// Service metadata response
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,

    /// Short description
    pub description: String,

    /// Application version
    pub version: String,

    /// Maintainer
    pub author: String,
}

/// Service metadata handler
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Quadrant".to_string(),
        description: "Task management API built on the Eisenhower decision matrix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        author: "Artem Koval".to_string(),
    })
}
