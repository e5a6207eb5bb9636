//! Diesel/SQLite persistence adapters.

pub mod error_mapping;
pub mod models;
pub mod pool;
pub mod schema;
pub mod sqlite_credential_store;
pub mod sqlite_ticket_repository;

pub use pool::{DbPool, PoolConfig, PoolError};
pub use sqlite_credential_store::{NewUserAccount, SqliteCredentialStore};
pub use sqlite_ticket_repository::SqliteTicketRepository;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Error applying schema migrations.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply migrations: {message}")]
pub struct MigrationError {
    message: String,
}

/// Bring the store's schema up to date.
///
/// Runs at startup before the server accepts requests.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get().map_err(|err| MigrationError {
        message: err.to_string(),
    })?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;
    Ok(())
}
