use std::error::Error;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use super::ValidateAndDumpCmd;
use crate::commands::setup::{RelationState, RelationStatus};
use crate::commands::{Context, Execute};
use crate::db::postgres::PostgresBackend;
use crate::db::schema::{validate, ValidationReport};
use crate::db::{DatabaseBackend, DatabaseConfig};
use crate::export::{save_pg_dump, summarize_dump, DumpSummary, SavedDump};

#[derive(Debug, Serialize)]
pub struct ValidateAndDumpResult {
    pub validation: ValidationReport,
    /// Empty when table creation was skipped
    pub created: Vec<RelationStatus>,
    pub source: String,
    pub files: SavedDump,
    pub summary: DumpSummary,
}

impl ValidateAndDumpResult {
    /// Model tables that did not show up in the dump.
    pub fn missing_tables(&self) -> Vec<&str> {
        self.validation
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| !self.summary.table_names.iter().any(|n| n == name))
            .collect()
    }
}

impl Execute for ValidateAndDumpCmd {
    type Output = ValidateAndDumpResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let validation = validate(&ctx.schema)?;
        info!(tables = validation.table_count(), "model validated");

        let created = if self.skip_create {
            Vec::new()
        } else {
            let DatabaseConfig::Postgres(config) = &ctx.database else {
                return Err("validate-and-dump creates tables on PostgreSQL; pass --database-url postgresql://... or --skip-create".into());
            };
            PostgresBackend::connect(&config.to_url())?
                .create_schema(&ctx.schema)?
                .into_iter()
                .map(|status| RelationStatus {
                    name: status.table,
                    status: if status.created {
                        RelationState::Created
                    } else {
                        RelationState::AlreadyExists
                    },
                })
                .collect()
        };

        let pg_dump = self.dump.pg_dump(&ctx.database)?;
        let source = pg_dump.describe();
        let dump = pg_dump.run()?;
        let files = save_pg_dump(&dump, &source, &self.dump.output_dir, Local::now().naive_local())?;

        let summary = summarize_dump(&dump);
        if summary.tables == 0 {
            warn!(%source, "no tables found in dump");
        }

        Ok(ValidateAndDumpResult {
            validation,
            created,
            source,
            files,
            summary,
        })
    }
}
