//! Database schema compilers.
//!
//! Generates backend-specific statements from the backend-agnostic schema
//! definitions: CozoScript for the embedded store, SQL DDL for export.

pub mod cozo;
pub mod sql;

pub use cozo::{CozoCompiler, SEQUENCES_RELATION};
pub use sql::{Dialect, SqlCompiler};
