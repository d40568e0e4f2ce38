//! Output formatting for validate-and-dump command results.

use super::execute::ValidateAndDumpResult;
use crate::commands::pg_dump::output::{saved_files, summary};
use crate::commands::setup::RelationState;
use crate::output::{heading, Outputable};

impl Outputable for ValidateAndDumpResult {
    fn to_table(&self) -> String {
        let mut output = heading("Schema Validation and Dump");

        let names: Vec<_> = self.validation.tables.iter().map(|t| t.name.as_str()).collect();
        output.push_str(&format!("✓ Found {} tables: {}\n", names.len(), names.join(", ")));
        for table in &self.validation.tables {
            if table.foreign_keys > 0 {
                output.push_str(&format!("  {}: {} foreign keys\n", table.name, table.foreign_keys));
            }
        }

        if self.created.is_empty() {
            output.push_str("\nTable creation skipped.\n");
        } else {
            output.push_str("\nTables:\n");
            for relation in &self.created {
                let status = match relation.status {
                    RelationState::Created => "created",
                    RelationState::AlreadyExists => "exists",
                    RelationState::WouldCreate => "would create",
                };
                output.push_str(&format!("  ✓ {} ({})\n", relation.name, status));
            }
        }

        output.push_str(&format!("\n{}\n", self.source));
        output.push_str(&saved_files(&self.files));
        output.push('\n');
        output.push_str(&summary(&self.summary));

        let missing = self.missing_tables();
        if self.summary.tables == 0 {
            output.push_str("\n⚠ No tables found in dump\n");
        } else if !missing.is_empty() {
            output.push_str(&format!("\n⚠ Missing from dump: {}\n", missing.join(", ")));
        } else {
            output.push_str("\n✅ Validation and dump completed successfully!\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::setup::RelationStatus;
    use crate::db::schema::{blog_schema, validate};
    use crate::export::{DumpSummary, SavedDump};
    use std::path::PathBuf;

    fn result(table_names: &[&str], created: Vec<RelationStatus>) -> ValidateAndDumpResult {
        ValidateAndDumpResult {
            validation: validate(&blog_schema()).unwrap(),
            created,
            source: "Container: pg".to_string(),
            files: SavedDump {
                path: PathBuf::from("schema/schema_postgres_1.sql"),
                clean_path: PathBuf::from("schema/schema_postgres_clean_1.sql"),
                latest: PathBuf::from("schema/schema_postgres_latest.sql"),
            },
            summary: DumpSummary {
                tables: table_names.len(),
                indexes: 0,
                constraints: 0,
                table_names: table_names.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_table_success() {
        let all = ["comments", "post_tags", "posts", "tags", "users"];
        let created = vec![RelationStatus {
            name: "users".to_string(),
            status: RelationState::Created,
        }];
        let table = result(&all, created).to_table();
        assert!(table.contains("✓ Found 5 tables: comments, post_tags, posts, tags, users"));
        assert!(table.contains("  comments: 3 foreign keys"));
        assert!(table.contains("  ✓ users (created)"));
        assert!(table.ends_with("completed successfully!\n"));
    }

    #[test]
    fn test_table_empty_dump_warns() {
        let table = result(&[], vec![]).to_table();
        assert!(table.contains("Table creation skipped."));
        assert!(table.contains("⚠ No tables found in dump"));
    }

    #[test]
    fn test_table_partial_dump_lists_missing() {
        let table = result(&["users"], vec![]).to_table();
        assert!(table.contains("⚠ Missing from dump: comments, post_tags, posts, tags"));
    }
}
