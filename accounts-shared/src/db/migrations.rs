/// Database migration runner
///
/// Migrations live in the workspace-level `migrations/` directory and are
/// embedded at compile time, so the binary carries its own schema.
///
/// Each migration is a reversible pair:
/// - `{timestamp}_{name}.up.sql`
/// - `{timestamp}_{name}.down.sql`

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{info, warn};

/// Migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or an applied migration
/// no longer matches its embedded checksum.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        embedded_migrations = MIGRATOR.iter().count(),
        "Starting database migrations"
    );

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
