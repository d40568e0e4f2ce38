//! Structural checks run before a schema is exported or applied.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use super::definition::Schema;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Table '{table}' has no columns")]
    EmptyTable { table: String },

    #[error("Column '{column}' is declared twice in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Table '{table}' has more than one primary key column")]
    CompositePrimaryKey { table: String },

    #[error("Foreign key {table}.{column} references unknown column {target}")]
    DanglingForeignKey {
        table: String,
        column: String,
        target: String,
    },

    #[error("Index '{index}' on '{table}' names unknown column '{column}'")]
    UnknownIndexColumn {
        table: String,
        index: String,
        column: String,
    },
}

/// Per-table summary produced by a successful validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub columns: usize,
    pub foreign_keys: usize,
    pub indexes: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub tables: Vec<TableSummary>,
}

impl ValidationReport {
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Validate a schema, returning a summary of every table on success.
///
/// Foreign keys must target a primary-key or unique column of a table in the
/// same schema.
pub fn validate(schema: &Schema) -> Result<ValidationReport, SchemaError> {
    let mut tables = Vec::with_capacity(schema.tables().len());

    for table in schema.tables() {
        if table.columns.is_empty() {
            return Err(SchemaError::EmptyTable {
                table: table.name.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for column in &table.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        if table.columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(SchemaError::CompositePrimaryKey {
                table: table.name.clone(),
            });
        }

        for (column, fk) in table.foreign_keys() {
            let target_ok = schema
                .table(&fk.table)
                .and_then(|t| t.column(&fk.column))
                .is_some_and(|c| c.primary_key || c.unique);
            if !target_ok {
                return Err(SchemaError::DanglingForeignKey {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    target: format!("{}.{}", fk.table, fk.column),
                });
            }
        }

        for index in &table.indexes {
            if let Some(missing) = index.columns.iter().find(|c| table.column(c).is_none()) {
                return Err(SchemaError::UnknownIndexColumn {
                    table: table.name.clone(),
                    index: index.name.clone(),
                    column: missing.clone(),
                });
            }
        }

        tables.push(TableSummary {
            name: table.name.clone(),
            columns: table.columns.len(),
            foreign_keys: table.foreign_keys().count(),
            indexes: table.indexes.len(),
        });
    }

    Ok(ValidationReport { tables })
}
