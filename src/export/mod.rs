//! Schema export to SQL files.
//!
//! - [`writer`]: per-dialect DDL files, the combined file, reflected-schema
//!   dumps and the `*_latest.sql` aliases
//! - [`pg_dump`]: running `pg_dump` against a live server and saving its output
//!
//! All files are written under a temporary name and renamed into place.

mod pg_dump;
mod process;
mod writer;

pub use pg_dump::{
    clean_dump, save_pg_dump, summarize_dump, DumpSummary, PgDump, PgDumpTarget, SavedDump,
    DEFAULT_TIMEOUT, PG_DUMP_FLAGS,
};
pub use process::{run_with_timeout, ProcessOutput};
pub use writer::{
    atomic_write, dump_reflected_schema, dump_schema_to_dir, file_timestamp, update_latest,
    SchemaDump, WrittenFile,
};

use std::path::PathBuf;

use thiserror::Error;

use crate::db::schema::SchemaError;
use crate::db::DbError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pg_dump failed (exit {status}): {stderr}")]
    DumpFailed { status: String, stderr: String },

    #[error("pg_dump timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ExportError::Io { path, source }
    }
}
