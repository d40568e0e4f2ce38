use std::process::ExitCode;

use clap::Parser;

use blogdb::cli::Args;
use blogdb::commands::Context;
use blogdb::db::DatabaseConfig;
use blogdb::logging;

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let database = DatabaseConfig::resolve(args.database_url.as_deref())?;
    let ctx = Context::new(database);
    args.command.run(&ctx, args.format)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(args.log_profile());

    match run(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
