/// PostgreSQL task repository
///
/// Reads the `tasks` table through a shared connection pool. Quadrant and
/// status filters are pushed down into the queries; search uses `ILIKE`
/// over title and description.

use super::{RepoError, TaskRepository};
use crate::models::{Quadrant, StatusFilter, Task};
use async_trait::async_trait;
use sqlx::PgPool;

const TASK_COLUMNS: &str = "id, title, description, is_important, deadline_at, \
                            quadrant, completed, created_at, completed_at, user_id";

/// sqlx-backed store over the `tasks` table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for administrative callers
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepoError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find(&self, id: i32) -> Result<Option<Task>, RepoError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, RepoError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE quadrant = $1 ORDER BY id"
        ))
        .bind(quadrant.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn by_status(&self, status: StatusFilter) -> Result<Vec<Task>, RepoError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE completed = $1 ORDER BY id"
        ))
        .bind(status == StatusFilter::Completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, RepoError> {
        // Treat the query as a literal substring, not an ILIKE pattern.
        let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{escaped}%");

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE title ILIKE $1 OR description ILIKE $1 \
             ORDER BY id"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_search_pattern_escaping() {
        // Mirrors the escaping in `search`
        let escaped = "50%_done".replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        assert_eq!(escaped, "50\\%\\_done");
    }
}
