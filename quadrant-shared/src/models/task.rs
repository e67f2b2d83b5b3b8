/// Task model and Eisenhower quadrant math
///
/// Tasks are the core entity of the system. Each task carries a quadrant
/// label derived from the Eisenhower decision matrix (importance × urgency)
/// at creation time. The label is fixed: editing importance or the deadline
/// later does not move the task between quadrants.
///
/// # Quadrants
///
/// ```text
///                 urgent        not urgent
/// important       Q1 (do)       Q2 (schedule)
/// not important   Q3 (delegate) Q4 (drop)
/// ```
///
/// # Schema
///
/// The post-migration shape of the `tasks` table:
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     is_important BOOLEAN NOT NULL DEFAULT FALSE,
///     deadline_at TIMESTAMP WITH TIME ZONE,
///     quadrant VARCHAR(2) NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How close a deadline has to be before a task counts as urgent.
const URGENCY_WINDOW_DAYS: i64 = 3;

/// Eisenhower matrix quadrant label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Quadrant {
    /// Urgent and important: do first
    Q1,

    /// Important, not urgent: schedule
    Q2,

    /// Urgent, not important: delegate
    Q3,

    /// Neither: drop
    Q4,
}

impl Quadrant {
    /// All quadrants in display order
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Derives the quadrant from the importance and urgency flags.
    ///
    /// This is computed once when a task is created and stored as a fixed
    /// label alongside the task.
    pub fn from_flags(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Quadrant::Q1,
            (true, false) => Quadrant::Q2,
            (false, true) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }

    /// Returns the label string for serialization and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = ParseQuadrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "Q1" => Ok(Quadrant::Q1),
            "Q2" => Ok(Quadrant::Q2),
            "Q3" => Ok(Quadrant::Q3),
            "Q4" => Ok(Quadrant::Q4),
            _ => Err(ParseQuadrantError),
        }
    }
}

/// Error returned when a string is not one of the four quadrant labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("quadrant must be one of Q1, Q2, Q3, Q4")]
pub struct ParseQuadrantError;

/// Completion-status filter for task queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Tasks marked done
    Completed,

    /// Tasks still open
    Pending,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }

    /// Whether a task matches this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            _ => Err(ParseStatusError),
        }
    }
}

/// Error returned when a string is not a known status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("status must be 'completed' or 'pending'")]
pub struct ParseStatusError;

/// A task in the Eisenhower matrix
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Sequential task id
    pub id: i32,

    /// Short task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Importance flag (one axis of the matrix)
    pub is_important: bool,

    /// Deadline, if one was set. Successor of the original boolean urgency
    /// flag; urgency is now derived from deadline proximity.
    pub deadline_at: Option<DateTime<Utc>>,

    /// Quadrant label fixed at creation time
    pub quadrant: Quadrant,

    /// Completion flag
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was marked done, `None` while pending
    pub completed_at: Option<DateTime<Utc>>,

    /// Owning user, populated once the user migrations have run
    pub user_id: Option<i32>,
}

impl Task {
    /// Whole days until the deadline, negative if it has passed.
    ///
    /// Returns `None` for tasks without a deadline.
    pub fn days_until_deadline(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline_at
            .map(|deadline| deadline.signed_duration_since(now).num_days())
    }

    /// Whether the task counts as urgent: a deadline within the urgency
    /// window. Tasks without a deadline are never urgent.
    pub fn is_urgent(&self, now: DateTime<Utc>) -> bool {
        self.deadline_at
            .map(|deadline| deadline <= now + Duration::days(URGENCY_WINDOW_DAYS))
            .unwrap_or(false)
    }

    /// Case-insensitive substring match against title and description
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task_with(deadline: Option<DateTime<Utc>>) -> Task {
        Task {
            id: 1,
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            is_important: true,
            deadline_at: deadline,
            quadrant: Quadrant::Q1,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            completed_at: None,
            user_id: None,
        }
    }

    #[test]
    fn test_quadrant_from_flags() {
        assert_eq!(Quadrant::from_flags(true, true), Quadrant::Q1);
        assert_eq!(Quadrant::from_flags(true, false), Quadrant::Q2);
        assert_eq!(Quadrant::from_flags(false, true), Quadrant::Q3);
        assert_eq!(Quadrant::from_flags(false, false), Quadrant::Q4);
    }

    #[test]
    fn test_quadrant_parse_valid() {
        assert_eq!("Q1".parse::<Quadrant>().unwrap(), Quadrant::Q1);
        assert_eq!("q3".parse::<Quadrant>().unwrap(), Quadrant::Q3);
    }

    #[test]
    fn test_quadrant_parse_invalid() {
        assert!("Q5".parse::<Quadrant>().is_err());
        assert!("".parse::<Quadrant>().is_err());
        assert!("urgent".parse::<Quadrant>().is_err());
    }

    #[test]
    fn test_quadrant_roundtrip_labels() {
        for q in Quadrant::ALL {
            assert_eq!(q.as_str().parse::<Quadrant>().unwrap(), q);
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "completed".parse::<StatusFilter>().unwrap(),
            StatusFilter::Completed
        );
        assert_eq!(
            "Pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::Pending
        );
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_matches() {
        let mut task = task_with(None);
        assert!(StatusFilter::Pending.matches(&task));
        assert!(!StatusFilter::Completed.matches(&task));
        task.completed = true;
        assert!(StatusFilter::Completed.matches(&task));
    }

    #[test]
    fn test_days_until_deadline() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let task = task_with(Some(now + Duration::days(5)));
        assert_eq!(task.days_until_deadline(now), Some(5));
        assert_eq!(task_with(None).days_until_deadline(now), None);
    }

    #[test]
    fn test_urgency_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert!(task_with(Some(now + Duration::days(2))).is_urgent(now));
        assert!(task_with(Some(now - Duration::days(1))).is_urgent(now));
        assert!(!task_with(Some(now + Duration::days(10))).is_urgent(now));
        assert!(!task_with(None).is_urgent(now));
    }

    #[test]
    fn test_matches_query_title_and_description() {
        let task = task_with(None);
        assert!(task.matches_query("report"));
        assert!(task.matches_query("REPORT"));
        assert!(task.matches_query("numbers"));
        assert!(!task.matches_query("groceries"));
    }
}
