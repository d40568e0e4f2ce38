use std::error::Error;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use super::DumpCmd;
use crate::commands::{Context, Execute};
use crate::db::schema::{validate, Dialect, ValidationReport};
use crate::export::{dump_reflected_schema, dump_schema_to_dir};

/// One generated file.
#[derive(Debug, Clone, Serialize)]
pub struct DumpedFile {
    /// Dialect name, or `all` for the combined file
    pub dialect: String,
    pub path: PathBuf,
    pub latest: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DumpResult {
    /// `model` or the name of the backend the schema was reflected from
    pub source: String,
    pub tables: Vec<String>,
    pub validation: Option<ValidationReport>,
    pub files: Vec<DumpedFile>,
}

impl Execute for DumpCmd {
    type Output = DumpResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let now = Local::now().naive_local();

        let validation = if self.validate {
            Some(validate(&ctx.schema)?)
        } else {
            None
        };

        if self.from_db {
            let backend = ctx.connect()?;
            let schema = backend.reflect_schema()?;
            let dialect = backend.dialect();
            let written = dump_reflected_schema(&schema, dialect, &self.output_dir, now)?;

            return Ok(DumpResult {
                source: backend.backend_name().to_string(),
                tables: schema.table_names().into_iter().map(String::from).collect(),
                validation,
                files: vec![DumpedFile {
                    dialect: dialect.name().to_string(),
                    path: written.path,
                    latest: written.latest,
                }],
            });
        }

        let dump = dump_schema_to_dir(&ctx.schema, &self.output_dir, &self.dialects, now)?;
        let mut files: Vec<DumpedFile> = dump
            .files
            .into_iter()
            .map(|(dialect, written)| DumpedFile {
                dialect: dialect.name().to_string(),
                path: written.path,
                latest: written.latest,
            })
            .collect();
        files.push(DumpedFile {
            dialect: "all".to_string(),
            path: dump.combined.path,
            latest: dump.combined.latest,
        });

        Ok(DumpResult {
            source: "model".to_string(),
            tables: ctx.schema.table_names().into_iter().map(String::from).collect(),
            validation,
            files,
        })
    }
}

impl DumpResult {
    pub fn dialects(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(|f| f.dialect.as_str())
            .filter(|d| *d != "all")
            .collect()
    }

    pub fn has_dialect(&self, dialect: Dialect) -> bool {
        self.dialects().contains(&dialect.name())
    }
}
