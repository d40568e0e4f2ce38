//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::Parser;

use crate::commands::Command;
use crate::logging::Profile;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "blogdb", author, version, about, long_about = None)]
pub struct Args {
    /// Database URL (sqlite://path, :memory:, postgresql://...). Falls back to
    /// .blogdb.json, then DATABASE_URL, then sqlite://./blog.db
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn log_profile(&self) -> Profile {
        if self.log_json {
            Profile::Json
        } else {
            Profile::Pretty
        }
    }
}
