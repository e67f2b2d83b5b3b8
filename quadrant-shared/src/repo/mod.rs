/// Task storage abstraction
///
/// Query handlers never touch the store directly; they go through the
/// `TaskRepository` trait so the backing store can be swapped without
/// touching the HTTP layer. Two implementations exist:
///
/// - `PgTaskRepository`: PostgreSQL via sqlx, the production store
/// - `MemoryTaskRepository`: in-memory, used by tests and as the seeded
///   demo store when no database is configured
///
/// All operations are read-only; the collection never changes after the
/// repository is constructed, so implementations share freely across
/// request handlers without locking.

pub mod memory;
pub mod pg;

use crate::models::{Quadrant, StatusFilter, Task};
use async_trait::async_trait;

pub use memory::MemoryTaskRepository;
pub use pg::PgTaskRepository;

/// Errors surfaced by repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only access to the task collection
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks in id order
    async fn list(&self) -> Result<Vec<Task>, RepoError>;

    /// A single task by id, `None` if absent
    async fn find(&self, id: i32) -> Result<Option<Task>, RepoError>;

    /// Tasks whose fixed quadrant label equals `quadrant`
    async fn by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, RepoError>;

    /// Tasks matching the completion-status filter
    async fn by_status(&self, status: StatusFilter) -> Result<Vec<Task>, RepoError>;

    /// Case-insensitive substring search over title and description
    async fn search(&self, query: &str) -> Result<Vec<Task>, RepoError>;

    /// Connectivity probe for the health endpoint
    async fn ping(&self) -> Result<(), RepoError>;
}
