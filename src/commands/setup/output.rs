//! Output formatting for setup command results.

use super::execute::{RelationState, SetupResult};
use crate::output::{heading, Outputable};

impl Outputable for SetupResult {
    fn to_table(&self) -> String {
        let mut output = heading("Database Setup");
        if let Some(backend) = &self.backend {
            output.push_str(&format!("Backend: {}\n", backend));
        }
        output.push('\n');

        if self.dry_run {
            output.push_str("Schema creation (dry-run):\n");
        } else {
            output.push_str("Schema creation:\n");
        }

        for relation in &self.relations {
            let (symbol, status_text) = match relation.status {
                RelationState::Created => ("✓", "created"),
                RelationState::AlreadyExists => ("✓", "exists"),
                RelationState::WouldCreate => ("→", "would create"),
            };
            output.push_str(&format!("  {} {} ({})\n", symbol, relation.name, status_text));
        }

        if self.dry_run {
            output.push_str("\nNo changes made (dry-run mode).\n");
        } else if self.created_new {
            output.push_str("\nDatabase ready.\n");
        } else {
            output.push_str("\nDatabase already configured.\n");
        }

        output
    }
}
