//! Storage-specific error type wrapping sqlx errors.

use localgw_domain::error::GatewayError;

/// Errors originating from the `SQLite` registry.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The pool was configured with no connections.
    #[error("connection pool must allow at least one connection")]
    EmptyPool,

    /// The session was already logged off.
    #[error("registry session is closed")]
    SessionClosed,

    /// A filter referenced a column the table does not have.
    #[error("unknown column {column} for table {table}")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<StorageError> for GatewayError {
    fn from(err: StorageError) -> Self {
        Self::registry(err)
    }
}
