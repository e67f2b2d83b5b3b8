//! Schema migration command
//!
//! Applies the migration registry to the configured database. With no
//! arguments, runs every migration not yet recorded in the ledger; with a
//! migration name, runs just that migration regardless of the ledger (safe
//! because every structural step checks the schema state first).
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quadrant-api --bin migrate                        # all pending
//! cargo run -p quadrant-api --bin migrate add_user_id_to_tasks  # one migration
//! ```

use quadrant_shared::db::migrations::{run_named, run_pending, status, StepOutcome};
use quadrant_shared::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadrant_shared=info,migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = create_pool(DatabaseConfig {
        url,
        ..Default::default()
    })
    .await?;

    let failed = match std::env::args().nth(1) {
        Some(name) => {
            let run = run_named(&pool, &name).await?;
            report_steps(run.name, &run.steps);
            !run.succeeded()
        }
        None => {
            let report = run_pending(&pool).await?;
            for run in &report.runs {
                report_steps(run.name, &run.steps);
            }
            if report.already_applied > 0 {
                tracing::info!(
                    count = report.already_applied,
                    "Migrations already recorded in the ledger"
                );
            }
            !report.fully_applied()
        }
    };

    let st = status(&pool).await?;
    tracing::info!(
        applied = st.applied_migrations,
        latest_version = ?st.latest_version,
        "Ledger state"
    );

    if failed {
        anyhow::bail!("some migration steps failed; fix the cause and re-run");
    }
    Ok(())
}

fn report_steps(migration: &str, steps: &[quadrant_shared::db::migrations::StepReport]) {
    for step in steps {
        match &step.outcome {
            StepOutcome::Applied => tracing::info!(migration, step = step.step, "applied"),
            StepOutcome::Skipped => tracing::info!(migration, step = step.step, "skipped (no-op)"),
            StepOutcome::Failed(e) => {
                tracing::error!(migration, step = step.step, error = %e, "failed")
            }
        }
    }
}
