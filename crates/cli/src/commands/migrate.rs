//! Database migration command.
//!
//! Runs the single shared migration set from `migrations/` at the workspace
//! root. Both binaries use the same database, so there is one history.

use tracing::info;

use super::{CommandError, connect, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    info!("Connecting to database...");
    let pool = connect(&url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
