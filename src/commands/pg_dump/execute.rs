use std::error::Error;

use chrono::Local;
use serde::Serialize;
use tracing::warn;

use super::PgDumpCmd;
use crate::commands::{Context, Execute};
use crate::export::{save_pg_dump, summarize_dump, DumpSummary, SavedDump};

#[derive(Debug, Serialize)]
pub struct PgDumpResult {
    /// Where the dump came from, with any password removed
    pub source: String,
    pub files: SavedDump,
    pub summary: DumpSummary,
}

impl Execute for PgDumpCmd {
    type Output = PgDumpResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let pg_dump = self.dump.pg_dump(&ctx.database)?;
        let source = pg_dump.describe();

        let dump = pg_dump.run()?;
        let files = save_pg_dump(&dump, &source, &self.dump.output_dir, Local::now().naive_local())?;
        let summary = summarize_dump(&dump);
        if summary.tables == 0 {
            warn!(%source, "pg_dump returned no tables");
        }

        Ok(PgDumpResult {
            source,
            files,
            summary,
        })
    }
}
