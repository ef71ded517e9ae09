//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Pool size used when nothing else is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Configuration for the `SQLite` registry adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:localgw.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound on pooled connections.
    ///
    /// Every open registry session pins one connection, so this caps the
    /// number of concurrent dispatches plus running workers. Zero is rejected.
    pub max_connections: u32,
}

impl Config {
    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the pool size is zero, or if the
    /// connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        if self.max_connections == 0 {
            return Err(StorageError::EmptyPool);
        }
        let options =
            SqliteConnectOptions::from_str(&self.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(
            database_url = %self.database_url,
            max_connections = self.max_connections,
            "registry database ready"
        );

        Ok(Database { pool })
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(max_connections: u32) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections,
        }
    }

    #[tokio::test]
    async fn should_create_registry_tables_when_using_memory_db() {
        let db = memory(DEFAULT_MAX_CONNECTIONS).build().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(
            names,
            ["iot_device", "iot_device_attribute", "iot_device_routing"]
        );
    }

    #[tokio::test]
    async fn should_cap_pool_at_configured_size() {
        let db = memory(2).build().await.unwrap();

        assert_eq!(db.pool().options().get_max_connections(), 2);
    }

    #[tokio::test]
    async fn should_reject_empty_pool() {
        let result = memory(0).build().await;

        assert!(matches!(result, Err(StorageError::EmptyPool)));
    }

    #[tokio::test]
    async fn should_fail_when_database_directory_is_missing() {
        let config = Config {
            database_url: "sqlite:/nonexistent/localgw/registry.db".to_string(),
            max_connections: 1,
        };

        let result = config.build().await;

        assert!(matches!(result, Err(StorageError::Database(_))));
    }
}
