//! Output formatting for demo command results.

use super::execute::{DemoResult, QueryExample};
use crate::output::{heading, Outputable};

fn section(output: &mut String, title: &str, examples: &[QueryExample]) {
    output.push_str(&format!("\n--- {} ---\n", title));
    for example in examples {
        output.push_str(&format!("{}: {}\n", example.label, example.value));
    }
}

impl Outputable for DemoResult {
    fn to_table(&self) -> String {
        let mut output = heading("Sample Data");
        output.push_str(&format!("Backend: {}\n\n", self.backend));
        for item in &self.created {
            output.push_str(&format!("Created {}\n", item));
        }
        section(&mut output, "Query Examples", &self.queries);
        section(&mut output, "Relationship Examples", &self.relationships);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sections() {
        let result = DemoResult {
            backend: "CozoMem".to_string(),
            created: vec!["user john_doe (id 1)".to_string()],
            queries: vec![QueryExample {
                label: "Total users".to_string(),
                value: "1".to_string(),
            }],
            relationships: vec![],
        };

        let table = result.to_table();
        assert!(table.contains("Created user john_doe (id 1)\n"));
        assert!(table.contains("\n--- Query Examples ---\nTotal users: 1\n"));
        assert!(table.ends_with("--- Relationship Examples ---\n"));
    }
}
