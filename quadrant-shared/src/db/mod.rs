/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: idempotent schema migration runner and registry

pub mod migrations;
pub mod pool;
