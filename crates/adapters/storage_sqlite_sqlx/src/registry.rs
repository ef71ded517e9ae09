//! `SQLite` implementation of [`RegistryConnector`] and [`RegistryClient`].

use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, FromRow, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};
use tokio::sync::Mutex;

use localgw_app::ports::{Filter, Record, RegistryClient, RegistryConnector, Table};
use localgw_domain::error::GatewayError;

use crate::error::StorageError;

/// Wrapper for converting database rows into registry [`Record`]s.
struct Wrapper(Record);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mut record = Record::new();
        for column in row.columns() {
            let raw = row.try_get_raw(column.ordinal())?;
            let value = if raw.is_null() {
                serde_json::Value::Null
            } else {
                match raw.type_info().name() {
                    "INTEGER" => serde_json::Value::from(row.try_get::<i64, _>(column.ordinal())?),
                    "REAL" => serde_json::Value::from(row.try_get::<f64, _>(column.ordinal())?),
                    _ => serde_json::Value::from(row.try_get::<String, _>(column.ordinal())?),
                }
            };
            record.insert(column.name().to_string(), value);
        }
        Ok(Self(record))
    }
}

/// Build `SELECT * FROM <table> WHERE a = ? AND b = ?` for `filter`.
///
/// Column names are checked against [`Table::columns`] since they cannot be
/// bound as parameters.
fn select_query(table: Table, filter: &Filter) -> Result<String, StorageError> {
    let mut sql = format!("SELECT * FROM {}", table.as_str());
    for (index, (column, _)) in filter.iter().enumerate() {
        if !table.columns().contains(&column) {
            return Err(StorageError::UnknownColumn {
                table: table.as_str(),
                column,
            });
        }
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        sql.push_str(column);
        sql.push_str(" = ?");
    }
    Ok(sql)
}

/// `SQLite`-backed device registry.
///
/// Every session holds one pooled connection until it is logged off.
#[derive(Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
}

impl SqliteRegistry {
    /// Create a new registry using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RegistryConnector for SqliteRegistry {
    type Client = SqliteRegistrySession;

    async fn connect(&self) -> Result<SqliteRegistrySession, GatewayError> {
        let connection = self.pool.acquire().await.map_err(StorageError::from)?;
        Ok(SqliteRegistrySession {
            connection: Mutex::new(Some(connection)),
        })
    }
}

/// One registry session, bound to a pooled connection.
pub struct SqliteRegistrySession {
    connection: Mutex<Option<PoolConnection<Sqlite>>>,
}

impl RegistryClient for SqliteRegistrySession {
    async fn read_multiple(
        &self,
        table: Table,
        filter: &Filter,
    ) -> Result<Option<Vec<Record>>, GatewayError> {
        let sql = select_query(table, filter)?;
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or(StorageError::SessionClosed)?;

        let mut query = sqlx::query_as::<_, Wrapper>(&sql);
        for (_, value) in filter.iter() {
            query = query.bind(value);
        }
        let rows: Vec<Wrapper> = query
            .fetch_all(&mut **connection)
            .await
            .map_err(StorageError::from)?;

        tracing::trace!(table = table.as_str(), rows = rows.len(), "registry read");
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.into_iter().map(|w| w.0).collect()))
        }
    }

    async fn logoff(&self) -> Result<(), GatewayError> {
        match self.connection.lock().await.take() {
            Some(connection) => {
                drop(connection);
                Ok(())
            }
            None => Err(StorageError::SessionClosed.into()),
        }
    }
}
