//! Database migration command.
//!
//! Migration files live in `crates/api/migrations/` and are embedded at
//! compile time, so the binary can migrate any environment it can reach.

use super::{CommandError, connect};

/// Run all pending API database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
