mod backend;
mod postgres;
mod sqlite;

pub use backend::{DatabaseBackend, SqlDialect};
pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;
