/// API route handlers
///
/// Organized by resource:
///
/// - `root`: Service metadata
/// - `health`: Health check endpoint
/// - `tasks`: Task list, filters, search, and single-task lookup
/// - `stats`: Aggregate counts and deadline overview

pub mod health;
pub mod root;
pub mod stats;
pub mod tasks;
