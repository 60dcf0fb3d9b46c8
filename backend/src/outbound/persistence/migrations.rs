//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::WalkRepositoryError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a dedicated synchronous connection.
///
/// Blocks the calling thread; run it on a blocking task.
pub fn run_pending_migrations(database_url: &str) -> Result<(), WalkRepositoryError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| WalkRepositoryError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| WalkRepositoryError::query(format!("migration: {err}")))?;
    info!(count = applied.len(), "schema migrations applied");
    Ok(())
}
