//! Backend-agnostic database schema definitions.
//!
//! The schema is an explicit value, built once by [`blog_schema`] and passed to
//! whatever needs it: the embedded store, the SQL exporter, and the live
//! PostgreSQL backend.
//!
//! # Overview
//!
//! 1. **Core Types** (`definition.rs`): `Schema`, `Table`, `Column`,
//!    `ForeignKey`, `Index`, `ColumnType`, `DefaultValue`, `OnDelete`
//! 2. **Table Definitions** (`tables.rs`): `users`, `posts`, `tags`,
//!    `post_tags`, `comments`
//! 3. **Validation** (`validate.rs`): structural checks and per-table summary
//! 4. **Compilers** (`compilers/`): CozoScript and SQL DDL
//!
//! # Type Mapping
//!
//! | Column Type | Cozo | PostgreSQL | MySQL | SQLite |
//! |-------------|------|------------|-------|--------|
//! | Integer | Int | INTEGER / SERIAL | INTEGER | INTEGER |
//! | Varchar(n) | String | VARCHAR(n) | VARCHAR(n) | VARCHAR(n) |
//! | Text | String | TEXT | TEXT | TEXT |
//! | Boolean | Bool | BOOLEAN | BOOL | BOOLEAN |
//! | Timestamp | Int (micros) | TIMESTAMP WITHOUT TIME ZONE | DATETIME | DATETIME |

pub mod compilers;
mod definition;
pub mod tables;
mod validate;

pub use compilers::{CozoCompiler, Dialect, SqlCompiler};
pub use definition::{
    Column, ColumnType, DefaultValue, ForeignKey, Index, OnDelete, Reference, Schema, Table,
};
pub use tables::blog_schema;
pub use validate::{validate, SchemaError, TableSummary, ValidationReport};
