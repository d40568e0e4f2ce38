//! Database backend trait for the schema-level operations shared by the
//! embedded store and a live PostgreSQL server.

use serde::Serialize;

use super::connection::Database;
use super::schema::{Dialect, Schema};
use super::DbError;

/// Outcome of creating one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStatus {
    pub table: String,
    pub created: bool,
}

/// Trait for database backends that can hold the blog schema.
pub trait DatabaseBackend {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Dialect used when rendering this backend's reflected schema.
    fn dialect(&self) -> Dialect;

    /// Check if a table exists.
    fn relation_exists(&self, name: &str) -> Result<bool, DbError>;

    /// Create every table in `schema` that does not exist yet.
    fn create_schema(&self, schema: &Schema) -> Result<Vec<CreateStatus>, DbError>;

    /// Read the deployed schema back from the database.
    fn reflect_schema(&self) -> Result<Schema, DbError>;

    /// The embedded store, for backends that support sessions.
    fn as_store(&self) -> Option<&Database> {
        None
    }
}
