mod cli_tests;
mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use crate::db::schema::Dialect;

/// Write SQL DDL for the blog schema, per dialect and combined
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  blogdb dump                                  # All dialects into ./schema
  blogdb dump --dialects postgresql,sqlite     # Only these dialects
  blogdb dump -o build/sql --validate          # Validate first, then dump
  blogdb --database-url ./blog.db dump --from-db   # Dump what the database holds")]
pub struct DumpCmd {
    /// Dialects to render (comma-separated). Defaults to all
    #[arg(long, value_enum, value_delimiter = ',')]
    pub dialects: Vec<Dialect>,

    /// Directory for the generated files
    #[arg(short, long, default_value = "schema")]
    pub output_dir: PathBuf,

    /// Reflect the schema from the configured database instead of the model
    #[arg(long, default_value_t = false)]
    pub from_db: bool,

    /// Validate the model before dumping
    #[arg(long, default_value_t = false)]
    pub validate: bool,
}
