/// Data models for Quadrant
///
/// This module contains the records served by the query API and touched by
/// the schema migrations.
///
/// # Models
///
/// - `task`: Task records with their Eisenhower quadrant label
/// - `user`: User accounts (introduced by the `create_users` migration)

pub mod task;
pub mod user;

pub use task::{Quadrant, StatusFilter, Task};
pub use user::{User, UserRole};
