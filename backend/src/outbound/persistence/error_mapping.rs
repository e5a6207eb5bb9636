//! Shared error mapping for repositories built on [`super::pool::DbPool`].

use tracing::debug;

use super::pool::{PoolError, RunError};

/// Map a [`RunError`] into a port-specific error through the port's query and
/// connection constructors.
///
/// Pool exhaustion, closed connections, and cancelled blocking tasks count as
/// connection problems; everything else is a query failure.
pub fn map_run_error<E, Q, C>(error: RunError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        RunError::Pool(PoolError::Checkout { message } | PoolError::Build { message }) => {
            debug!(%message, "pool checkout failed");
            connection(message)
        }
        RunError::Cancelled => connection("database task was cancelled".to_owned()),
        RunError::Query(err) => {
            match &err {
                DieselError::DatabaseError(kind, info) => {
                    debug!(?kind, message = info.message(), "diesel operation failed");
                }
                other => debug!(error = %other, "diesel operation failed"),
            }
            match err {
                DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                    connection("database connection error".to_owned())
                }
                DieselError::NotFound => query("record not found".to_owned()),
                _ => query("database error".to_owned()),
            }
        }
    }
}
