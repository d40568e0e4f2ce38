//! Database access for the blog store.
//!
//! This module provides the storage layer used by the CRUD helpers and the
//! schema exporter:
//! - Connection management (SQLite-backed CozoDB, in-memory for tests, or a
//!   live PostgreSQL server for export and drift checks)
//! - A unit-of-work `Session` with constraint checks and cascading deletes
//! - Row extraction into typed entities
//!
//! # Architecture
//!
//! The embedded store is CozoDB. Every table in the [`schema::Schema`] becomes a
//! stored relation keyed on its primary key (or on all columns for association
//! tables). CozoDB has no foreign keys, unique indexes or defaults, so
//! `Session` enforces those from the schema before each write.
//!
//! # Type Decisions
//!
//! **Why `i64` microseconds for timestamps?**
//! CozoDB has no native timestamp type and returns integers as `Num::Int(i64)`.
//! Microseconds since the epoch keep ordering and round-trip exactly through
//! `chrono::DateTime<Utc>`.

mod backend;
mod config;
mod connection;
pub mod postgres;
mod query;
mod record;
pub mod schema;
mod session;
mod value;

pub use backend::{CreateStatus, DatabaseBackend};
pub use config::{DatabaseConfig, PostgresConfig, DEFAULT_DATABASE_URL};
pub use connection::Database;
pub use query::{Params, Query};
pub use record::{Entity, Record};
pub use session::Session;
pub use value::{
    boolean, display_value, int, null, opt_int, opt_text, opt_timestamp, text, timestamp,
    DatabaseValue, Values,
};

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open database '{path}': {message}")]
    OpenFailed { path: String, message: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    #[error("Missing column '{name}' in query result")]
    MissingColumn { name: String },

    #[error("Unknown table '{name}'")]
    UnknownTable { name: String },

    #[error("Unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Column '{column}' expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("NOT NULL constraint failed: {table}.{column}")]
    NotNullViolation { table: String, column: String },

    #[error("UNIQUE constraint failed: {table}.{column} = {value}")]
    UniqueViolation {
        table: String,
        column: String,
        value: String,
    },

    #[error("FOREIGN KEY constraint failed: {table}.{column} = {value} (references {target})")]
    ForeignKeyViolation {
        table: String,
        column: String,
        value: String,
        target: String,
    },
}

impl DbError {
    pub(crate) fn query(err: impl std::fmt::Display) -> Self {
        DbError::QueryFailed {
            message: err.to_string(),
        }
    }
}
