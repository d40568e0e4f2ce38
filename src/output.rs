//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Title line followed by a rule of the same width.
pub(crate) fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(title.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
        count: usize,
    }

    impl Outputable for Sample {
        fn to_table(&self) -> String {
            format!("{}: {}", self.name, self.count)
        }
    }

    #[test]
    fn test_format_table() {
        let sample = Sample { name: "users", count: 2 };
        assert_eq!(sample.format(OutputFormat::Table), "users: 2");
    }

    #[test]
    fn test_format_json() {
        let sample = Sample { name: "users", count: 2 };
        let value: serde_json::Value = serde_json::from_str(&sample.format(OutputFormat::Json)).unwrap();
        assert_eq!(value["name"], "users");
        assert_eq!(value["count"], 2);
    }

    #[test]
    fn test_format_toon_mentions_fields() {
        let sample = Sample { name: "users", count: 2 };
        let toon = sample.format(OutputFormat::Toon);
        assert!(toon.contains("name"));
        assert!(toon.contains("users"));
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading("Setup"), "Setup\n=====\n");
    }
}
