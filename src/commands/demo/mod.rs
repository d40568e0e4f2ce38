mod cli_tests;
mod execute;
mod output;

use clap::Args;

pub use execute::{DemoResult, QueryExample};

/// Populate sample data and print query examples
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  blogdb --database-url :memory: demo    # Throwaway run
  blogdb --database-url ./demo.db demo   # Keep the sample data

The sample usernames are fixed, so a second run against the same file fails
on the unique username constraint.")]
pub struct DemoCmd {}
