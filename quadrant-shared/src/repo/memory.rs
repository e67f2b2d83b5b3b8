/// In-memory task repository
///
/// Holds a fixed task collection built at construction time. Used by the
/// HTTP tests and as the fallback store when no `DATABASE_URL` is
/// configured, in which case it carries the four demo tasks (one per
/// quadrant, the Q4 task already completed).

use super::{RepoError, TaskRepository};
use crate::models::{Quadrant, StatusFilter, Task};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Read-only in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskRepository {
    tasks: Vec<Task>,
}

impl MemoryTaskRepository {
    /// Creates a store over an explicit task collection
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Creates the seeded demo store: ids 1-4, quadrants Q1-Q4, id 4
    /// completed.
    pub fn seeded() -> Self {
        let now = Utc::now();

        let mut id = 0;
        let mut seed = |title: &str,
                        description: Option<&str>,
                        important: bool,
                        deadline: Option<DateTime<Utc>>,
                        completed: bool| {
            id += 1;
            let urgent = deadline.is_some();
            Task {
                id,
                title: title.to_string(),
                description: description.map(str::to_string),
                is_important: important,
                deadline_at: deadline,
                quadrant: Quadrant::from_flags(important, urgent),
                completed,
                created_at: now,
                completed_at: completed.then_some(now),
                user_id: Some(1),
            }
        };

        Self::new(vec![
            seed(
                "Finish the project report",
                Some("Deadline tomorrow, the boss is waiting"),
                true,
                Some(now + Duration::days(1)),
                false,
            ),
            seed(
                "Plan next quarter",
                Some("Strategic planning, no fixed date"),
                true,
                None,
                false,
            ),
            seed(
                "Answer the mail backlog",
                Some("Quick replies, could be delegated"),
                false,
                Some(now + Duration::days(2)),
                false,
            ),
            seed("Sort the meme folder", None, false, None, true),
        ])
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepoError> {
        Ok(self.tasks.clone())
    }

    async fn find(&self, id: i32) -> Result<Option<Task>, RepoError> {
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>, RepoError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.quadrant == quadrant)
            .cloned()
            .collect())
    }

    async fn by_status(&self, status: StatusFilter) -> Result<Vec<Task>, RepoError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| status.matches(t))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>, RepoError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.matches_query(query))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_shape() {
        let repo = MemoryTaskRepository::seeded();
        let tasks = repo.list().await.unwrap();

        assert_eq!(tasks.len(), 4);
        assert_eq!(
            tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            tasks.iter().map(|t| t.quadrant).collect::<Vec<_>>(),
            vec![Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4]
        );
        assert!(tasks[3].completed);
        assert!(tasks[3].completed_at.is_some());
        assert!(tasks[..3].iter().all(|t| !t.completed));
        assert!(tasks[..3].iter().all(|t| t.completed_at.is_none()));
    }

    #[tokio::test]
    async fn test_find() {
        let repo = MemoryTaskRepository::seeded();
        assert!(repo.find(1).await.unwrap().is_some());
        assert!(repo.find(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_quadrant_only_matching() {
        let repo = MemoryTaskRepository::seeded();
        for q in Quadrant::ALL {
            let tasks = repo.by_quadrant(q).await.unwrap();
            assert_eq!(tasks.len(), 1);
            assert!(tasks.iter().all(|t| t.quadrant == q));
        }
    }

    #[tokio::test]
    async fn test_by_status_partition() {
        let repo = MemoryTaskRepository::seeded();
        let completed = repo.by_status(StatusFilter::Completed).await.unwrap();
        let pending = repo.by_status(StatusFilter::Pending).await.unwrap();

        assert_eq!(completed.len(), 1);
        assert_eq!(pending.len(), 3);
        assert_eq!(completed.len() + pending.len(), repo.list().await.unwrap().len());
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let repo = MemoryTaskRepository::seeded();
        assert_eq!(repo.search("REPORT").await.unwrap().len(), 1);
        assert!(!repo.search("delegated").await.unwrap().is_empty());
        assert!(repo.search("nonexistent").await.unwrap().is_empty());
    }
}
