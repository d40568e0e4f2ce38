//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `execute.rs` producing a serializable result
//! - An `output.rs` rendering that result as a table

mod demo;
mod dump;
mod pg_dump;
mod setup;
mod validate_and_dump;

pub use demo::DemoCmd;
pub use dump::DumpCmd;
pub use pg_dump::PgDumpCmd;
pub use setup::SetupCmd;
pub use validate_and_dump::ValidateAndDumpCmd;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use tracing::info;

use crate::db::postgres::redact;
use crate::db::schema::{blog_schema, Schema};
use crate::db::{DatabaseBackend, DatabaseConfig};
use crate::export::PgDump;
use crate::output::{OutputFormat, Outputable};

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub database: DatabaseConfig,
    pub schema: Schema,
}

impl Context {
    pub fn new(database: DatabaseConfig) -> Self {
        Self {
            database,
            schema: blog_schema(),
        }
    }

    /// Open the configured backend with this context's schema.
    pub fn connect(&self) -> Result<Box<dyn DatabaseBackend>, Box<dyn Error>> {
        info!(database = %redact(&self.database.url()), "connecting");
        self.database.connect(self.schema.clone())
    }
}

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>>;
}

/// Options shared by the commands that run `pg_dump`.
#[derive(Args, Debug, Clone)]
pub struct PgDumpArgs {
    /// Run pg_dump inside this running container via `docker exec`
    #[arg(long)]
    pub container: Option<String>,

    /// Database user for the containerised pg_dump (defaults to the URL's user, then "postgres")
    #[arg(long)]
    pub user: Option<String>,

    /// Database name for the containerised pg_dump (defaults to the URL's database, then "postgres")
    #[arg(long)]
    pub database: Option<String>,

    /// Directory for the dump files
    #[arg(short, long, default_value = "schema")]
    pub output_dir: PathBuf,

    /// Seconds to wait for pg_dump before killing it
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: u64,
}

impl PgDumpArgs {
    /// Build the `pg_dump` invocation: containerised when `--container` is
    /// given, otherwise local against the configured PostgreSQL URL.
    pub fn pg_dump(&self, database: &DatabaseConfig) -> Result<PgDump, Box<dyn Error>> {
        let postgres = match database {
            DatabaseConfig::Postgres(config) => Some(config),
            _ => None,
        };

        let dump = match (&self.container, postgres) {
            (Some(container), _) => {
                let user = self
                    .user
                    .clone()
                    .or_else(|| postgres.and_then(|c| c.user_name()))
                    .unwrap_or_else(|| "postgres".to_string());
                let name = self
                    .database
                    .clone()
                    .or_else(|| postgres.and_then(|c| c.database_name()))
                    .unwrap_or_else(|| "postgres".to_string());
                PgDump::container(container, &user, &name)
            }
            (None, Some(config)) => PgDump::local(&config.to_url()),
            (None, None) => {
                return Err(format!(
                    "pg_dump needs a PostgreSQL database (got {}); pass --database-url postgresql://... or --container NAME",
                    redact(&database.url())
                )
                .into());
            }
        };

        Ok(dump.timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the blog tables in the configured database
    Setup(SetupCmd),

    /// Write SQL DDL for the blog schema, per dialect and combined
    Dump(DumpCmd),

    /// Save a pg_dump of a live PostgreSQL schema
    PgDump(PgDumpCmd),

    /// Validate the model, apply it to PostgreSQL, then pg_dump it
    ValidateAndDump(ValidateAndDumpCmd),

    /// Populate sample data and print query examples
    Demo(DemoCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, ctx: &Context, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Setup(cmd) => Ok(cmd.execute(ctx)?.format(format)),
            Command::Dump(cmd) => Ok(cmd.execute(ctx)?.format(format)),
            Command::PgDump(cmd) => Ok(cmd.execute(ctx)?.format(format)),
            Command::ValidateAndDump(cmd) => Ok(cmd.execute(ctx)?.format(format)),
            Command::Demo(cmd) => Ok(cmd.execute(ctx)?.format(format)),
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().map(String::as_str).unwrap_or_default()).into())
            }
        }
    }
}
