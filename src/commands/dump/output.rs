//! Output formatting for dump command results.

use super::execute::DumpResult;
use crate::output::{heading, Outputable};

impl Outputable for DumpResult {
    fn to_table(&self) -> String {
        let mut output = heading("Schema Dump");
        output.push_str(&format!("Source: {}\n", self.source));
        output.push_str(&format!(
            "Found {} tables: {}\n",
            self.tables.len(),
            self.tables.join(", ")
        ));

        if let Some(report) = &self.validation {
            output.push_str("\nValidation:\n");
            for table in &report.tables {
                if table.foreign_keys > 0 {
                    output.push_str(&format!("  {}: {} foreign keys\n", table.name, table.foreign_keys));
                }
            }
            output.push_str("  ✓ model is valid\n");
        }

        output.push_str("\nFiles:\n");
        for file in &self.files {
            output.push_str(&format!("  ✓ [{}] {}\n", file.dialect, file.path.display()));
            output.push_str(&format!("    latest: {}\n", file.latest.display()));
        }

        output
    }
}
