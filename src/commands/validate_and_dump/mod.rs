mod cli_tests;
mod execute;
mod output;

use clap::Args;

use crate::commands::PgDumpArgs;

/// Validate the model, create it on PostgreSQL, then pg_dump the result
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  blogdb --database-url postgresql://dev:pw@localhost/blog validate-and-dump
  blogdb --database-url postgresql://dev:pw@localhost/blog validate-and-dump --container postgres-dev
  blogdb validate-and-dump --skip-create --container postgres-dev   # Dump what is already deployed")]
pub struct ValidateAndDumpCmd {
    /// Do not create tables before dumping
    #[arg(long, default_value_t = false)]
    pub skip_create: bool,

    #[command(flatten)]
    pub dump: PgDumpArgs,
}
