mod execute;
pub(crate) mod output;

use clap::Args;

use crate::commands::PgDumpArgs;

/// Save a pg_dump of a live PostgreSQL schema
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  blogdb --database-url postgresql://dev:pw@localhost/blog pg-dump   # Local pg_dump
  blogdb pg-dump --container postgres-dev --user dev --database blog  # Inside a container
  blogdb pg-dump --container postgres-dev --timeout-secs 60 -o dumps")]
pub struct PgDumpCmd {
    #[command(flatten)]
    pub dump: PgDumpArgs,
}
