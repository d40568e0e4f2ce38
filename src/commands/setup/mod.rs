mod cli_tests;
mod execute;
mod output;

use clap::Args;

pub use execute::{RelationState, RelationStatus, SetupResult};

/// Create the blog tables in the configured database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  blogdb setup                                         # Create tables in ./blog.db
  blogdb setup --dry-run                               # Show what would be created
  blogdb --database-url postgresql://dev@localhost/blog setup  # Apply to PostgreSQL")]
pub struct SetupCmd {
    /// Show what would be created without doing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
