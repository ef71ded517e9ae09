//! # localgw-adapter-storage-sqlite-sqlx
//!
//! `SQLite` device registry adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the registry port defined in `localgw-app::ports::registry`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map database rows to registry records
//!
//! ## Dependency rule
//! Depends on `localgw-app` (for port traits) and `localgw-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
pub mod pool;
mod registry;

pub use error::StorageError;
pub use registry::{SqliteRegistry, SqliteRegistrySession};
