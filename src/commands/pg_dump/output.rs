//! Output formatting for pg-dump command results.

use super::execute::PgDumpResult;
use crate::export::{DumpSummary, SavedDump};
use crate::output::{heading, Outputable};

pub(crate) fn saved_files(files: &SavedDump) -> String {
    format!(
        "  ✓ Schema dumped to {}\n  ✓ Clean version: {}\n  Latest link: {}\n",
        files.path.display(),
        files.clean_path.display(),
        files.latest.display()
    )
}

pub(crate) fn summary(summary: &DumpSummary) -> String {
    let mut output = String::from("Schema summary:\n");
    output.push_str(&format!("  Tables: {}\n", summary.tables));
    output.push_str(&format!("  Indexes: {}\n", summary.indexes));
    output.push_str(&format!("  Constraints: {}\n", summary.constraints));
    if !summary.table_names.is_empty() {
        output.push_str(&format!("  Table names: {}\n", summary.table_names.join(", ")));
    }
    output
}

impl Outputable for PgDumpResult {
    fn to_table(&self) -> String {
        let mut output = heading("PostgreSQL Schema Dump");
        output.push_str(&format!("{}\n\n", self.source));
        output.push_str(&saved_files(&self.files));
        output.push('\n');
        output.push_str(&summary(&self.summary));
        output
    }
}
