/// Idempotent schema migration runner
///
/// Migrations are an ordered, versioned registry of named steps. Every
/// structural step carries a precondition checked against the database
/// catalog, so each element (table, column, index, constraint) moves
/// one-way between {absent, present} and re-running a migration is always
/// safe. Applied migrations are recorded in a `schema_migrations` ledger
/// table; `run_pending` skips anything already recorded.
///
/// # Execution model
///
/// One transaction per migration, one savepoint per step. A failing step is
/// rolled back to its savepoint, logged, and the remaining steps still run:
/// migrations degrade to partial application instead of rolling back
/// wholesale. A migration is recorded in the ledger only when every step
/// succeeded, so a partially failed migration is retried on the next run
/// and its preconditions skip whatever already landed.
///
/// Step order within a migration is load-bearing: `add_user_id_to_tasks`
/// adds the column, backfills it, and only then tightens it to NOT NULL and
/// attaches the foreign key.
///
/// # Example
///
/// ```no_run
/// use quadrant_shared::db::migrations::run_pending;
/// use quadrant_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let report = run_pending(&pool).await?;
/// println!("{} migrations applied", report.runs.len());
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, Acquire, PgConnection, PgPool, Postgres};
use tracing::{debug, info, warn};

/// Existence guard evaluated before a step mutates the schema.
///
/// The guard names the state that must hold for the step to run; when the
/// target state is already in place the step is skipped with a no-op
/// notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Always run (backfills and other idempotent DML)
    None,

    /// Run only if the table does not exist yet
    TableAbsent(&'static str),

    /// Run only if the column does not exist yet
    ColumnAbsent {
        table: &'static str,
        column: &'static str,
    },

    /// Run only if the column still exists (column drops)
    ColumnPresent {
        table: &'static str,
        column: &'static str,
    },

    /// Run only if the named constraint does not exist yet
    ConstraintAbsent {
        table: &'static str,
        constraint: &'static str,
    },

    /// Run only if the named index does not exist yet
    IndexAbsent(&'static str),
}

impl Precondition {
    /// Checks the guard against catalog metadata.
    ///
    /// Returns `true` when the step should be applied.
    pub async fn should_apply(&self, conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
        match self {
            Precondition::None => Ok(true),
            Precondition::TableAbsent(table) => Ok(!table_exists(conn, table).await?),
            Precondition::ColumnAbsent { table, column } => {
                Ok(!column_exists(conn, table, column).await?)
            }
            Precondition::ColumnPresent { table, column } => {
                column_exists(conn, table, column).await
            }
            Precondition::ConstraintAbsent { table, constraint } => {
                Ok(!constraint_exists(conn, table, constraint).await?)
            }
            Precondition::IndexAbsent(index) => Ok(!index_exists(conn, index).await?),
        }
    }
}

async fn table_exists(conn: &mut PgConnection, table: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = $1
        )",
    )
    .bind(table)
    .fetch_one(conn)
    .await
}

async fn column_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2
        )",
    )
    .bind(table)
    .bind(column)
    .fetch_one(conn)
    .await
}

async fn constraint_exists(
    conn: &mut PgConnection,
    table: &str,
    constraint: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.table_constraints
            WHERE table_schema = 'public' AND table_name = $1 AND constraint_name = $2
        )",
    )
    .bind(table)
    .bind(constraint)
    .fetch_one(conn)
    .await
}

async fn index_exists(conn: &mut PgConnection, index: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM pg_indexes
            WHERE schemaname = 'public' AND indexname = $1
        )",
    )
    .bind(index)
    .fetch_one(conn)
    .await
}

/// One guarded schema change
#[derive(Debug, Clone)]
pub struct Step {
    /// Short human-readable step name, used in logs and reports
    pub name: &'static str,

    /// Existence guard
    pub precondition: Precondition,

    /// The statement to apply when the guard passes
    pub sql: &'static str,
}

/// A named, versioned migration: a fixed, hand-ordered step sequence
#[derive(Debug, Clone)]
pub struct Migration {
    /// Ledger version, strictly increasing across the registry
    pub version: i64,

    /// Migration name, unique across the registry
    pub name: &'static str,

    /// Steps in application order
    pub steps: Vec<Step>,
}

/// The full migration registry in version order.
///
/// New migrations are appended with the next version; existing entries are
/// never edited once they have shipped.
pub fn registry() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "create_users",
            steps: vec![
                Step {
                    name: "create users table",
                    precondition: Precondition::TableAbsent("users"),
                    sql: "CREATE TABLE users (
                              id SERIAL PRIMARY KEY,
                              nickname VARCHAR(50) UNIQUE NOT NULL,
                              email VARCHAR(100) UNIQUE NOT NULL,
                              hashed_password VARCHAR(255) NOT NULL,
                              role VARCHAR(10) NOT NULL DEFAULT 'user'
                          )",
                },
                Step {
                    name: "index users.nickname",
                    precondition: Precondition::IndexAbsent("idx_users_nickname"),
                    sql: "CREATE INDEX idx_users_nickname ON users(nickname)",
                },
                Step {
                    name: "index users.email",
                    precondition: Precondition::IndexAbsent("idx_users_email"),
                    sql: "CREATE INDEX idx_users_email ON users(email)",
                },
            ],
        },
        Migration {
            version: 2,
            name: "add_user_id_to_tasks",
            steps: vec![
                Step {
                    name: "add tasks.user_id column",
                    precondition: Precondition::ColumnAbsent {
                        table: "tasks",
                        column: "user_id",
                    },
                    // Nullable first; tightened only after the backfill.
                    sql: "ALTER TABLE tasks ADD COLUMN user_id INTEGER",
                },
                Step {
                    name: "backfill tasks.user_id",
                    precondition: Precondition::None,
                    sql: "UPDATE tasks SET user_id = 1 WHERE user_id IS NULL",
                },
                Step {
                    name: "set tasks.user_id NOT NULL",
                    precondition: Precondition::None,
                    sql: "ALTER TABLE tasks ALTER COLUMN user_id SET NOT NULL",
                },
                Step {
                    name: "index tasks.user_id",
                    precondition: Precondition::IndexAbsent("ix_tasks_user_id"),
                    sql: "CREATE INDEX ix_tasks_user_id ON tasks(user_id)",
                },
                Step {
                    name: "foreign key tasks.user_id -> users.id",
                    precondition: Precondition::ConstraintAbsent {
                        table: "tasks",
                        constraint: "fk_tasks_user_id",
                    },
                    sql: "ALTER TABLE tasks
                          ADD CONSTRAINT fk_tasks_user_id
                          FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE",
                },
            ],
        },
        Migration {
            version: 3,
            name: "add_deadline_to_tasks",
            steps: vec![
                Step {
                    name: "add tasks.deadline_at column",
                    precondition: Precondition::ColumnAbsent {
                        table: "tasks",
                        column: "deadline_at",
                    },
                    sql: "ALTER TABLE tasks ADD COLUMN deadline_at TIMESTAMP WITH TIME ZONE",
                },
                Step {
                    name: "drop tasks.is_urgent column",
                    precondition: Precondition::ColumnPresent {
                        table: "tasks",
                        column: "is_urgent",
                    },
                    sql: "ALTER TABLE tasks DROP COLUMN is_urgent",
                },
            ],
        },
        Migration {
            version: 4,
            name: "set_admin_role",
            steps: vec![Step {
                name: "promote admin account",
                precondition: Precondition::None,
                sql: "UPDATE users SET role = 'ADMIN' WHERE email = 'admin@example.com'",
            }],
        },
    ]
}

/// Errors surfaced by the migration runner
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Ledger access or transaction control failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `run_named` was given a name not present in the registry
    #[error("unknown migration '{0}'")]
    UnknownMigration(String),
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Guard passed and the statement was applied
    Applied,

    /// Guard reported the target state already holds
    Skipped,

    /// The step failed; rolled back to its savepoint, later steps still ran
    Failed(String),
}

/// Per-step result within one migration run
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: &'static str,
    pub outcome: StepOutcome,
}

/// Result of running one migration
#[derive(Debug, Clone)]
pub struct MigrationRun {
    pub version: i64,
    pub name: &'static str,
    pub steps: Vec<StepReport>,
}

impl MigrationRun {
    /// Whether every step either applied or was a no-op
    pub fn succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|s| !matches!(s.outcome, StepOutcome::Failed(_)))
    }
}

/// Result of a runner invocation
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Migrations that were attempted this run
    pub runs: Vec<MigrationRun>,

    /// Migrations skipped because the ledger already records them
    pub already_applied: usize,
}

impl MigrationReport {
    /// Whether every attempted migration fully succeeded
    pub fn fully_applied(&self) -> bool {
        self.runs.iter().all(MigrationRun::succeeded)
    }
}

/// Ledger snapshot, for status reporting
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations recorded in the ledger
    pub applied_migrations: usize,

    /// Highest recorded version
    pub latest_version: Option<i64>,
}

async fn ensure_ledger(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn is_recorded(pool: &PgPool, version: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT FROM schema_migrations WHERE version = $1)")
        .bind(version)
        .fetch_one(pool)
        .await
}

/// Runs every migration not yet recorded in the ledger, in version order.
///
/// Creates the ledger table on first use. Returns a report of what was
/// attempted; step failures are reported, not returned as errors, so one
/// broken migration does not stop later independent ones from running.
pub async fn run_pending(pool: &PgPool) -> Result<MigrationReport, MigrationError> {
    ensure_ledger(pool).await?;

    let mut report = MigrationReport::default();
    for migration in registry() {
        if is_recorded(pool, migration.version).await? {
            debug!(name = migration.name, "Migration already applied, skipping");
            report.already_applied += 1;
            continue;
        }

        report.runs.push(apply_migration(pool, &migration).await?);
    }

    if report.fully_applied() {
        info!(
            applied = report.runs.len(),
            already_applied = report.already_applied,
            "Migrations completed"
        );
    } else {
        warn!("Some migration steps failed; re-run after fixing the cause");
    }

    Ok(report)
}

/// Runs a single migration by name, regardless of the ledger.
///
/// Mirrors the original standalone migration commands: every migration is
/// independently invokable, and its guards make the re-run a no-op when the
/// schema is already in shape. Records the migration on full success.
pub async fn run_named(pool: &PgPool, name: &str) -> Result<MigrationRun, MigrationError> {
    ensure_ledger(pool).await?;

    let migration = registry()
        .into_iter()
        .find(|m| m.name == name)
        .ok_or_else(|| MigrationError::UnknownMigration(name.to_string()))?;

    apply_migration(pool, &migration).await
}

/// Applies one migration: one transaction, one savepoint per step.
///
/// The transaction is committed even when steps failed, so the steps that
/// did succeed stay applied (partial application). The ledger row is only
/// written when the whole migration succeeded.
async fn apply_migration(
    pool: &PgPool,
    migration: &Migration,
) -> Result<MigrationRun, MigrationError> {
    info!(
        version = migration.version,
        name = migration.name,
        "Running migration"
    );

    let mut tx = pool.begin().await?;
    let mut run = MigrationRun {
        version: migration.version,
        name: migration.name,
        steps: Vec::with_capacity(migration.steps.len()),
    };

    for step in &migration.steps {
        let outcome = apply_step(&mut tx, step).await?;
        run.steps.push(StepReport {
            step: step.name,
            outcome,
        });
    }

    if run.succeeded() {
        // `run_named` re-runs recorded migrations, so the ledger row may
        // already exist; an all-skipped re-run must stay a no-op.
        sqlx::query(
            "INSERT INTO schema_migrations (version, name) VALUES ($1, $2)
             ON CONFLICT (version) DO NOTHING",
        )
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(run)
}

/// Runs one step inside a savepoint so its failure cannot poison the
/// enclosing transaction.
async fn apply_step(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    step: &Step,
) -> Result<StepOutcome, MigrationError> {
    let mut savepoint = tx.begin().await?;

    let should_apply = match step.precondition.should_apply(&mut savepoint).await {
        Ok(v) => v,
        Err(e) => {
            savepoint.rollback().await?;
            warn!(step = step.name, error = %e, "Precondition check failed");
            return Ok(StepOutcome::Failed(e.to_string()));
        }
    };

    if !should_apply {
        savepoint.commit().await?;
        info!(step = step.name, "Already in target state, skipping");
        return Ok(StepOutcome::Skipped);
    }

    match sqlx::query(step.sql).execute(&mut *savepoint).await {
        Ok(_) => {
            savepoint.commit().await?;
            info!(step = step.name, "Step applied");
            Ok(StepOutcome::Applied)
        }
        Err(e) => {
            savepoint.rollback().await?;
            warn!(step = step.name, error = %e, "Step failed, continuing with remaining steps");
            Ok(StepOutcome::Failed(e.to_string()))
        }
    }
}

/// Reads the ledger for status reporting
pub async fn status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let ledger_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'schema_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !ledger_exists {
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM schema_migrations",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
    })
}

/// Creates the database if it does not exist. Intended for development and
/// tests; in production the database already exists.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
