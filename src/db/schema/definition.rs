//! Core schema definition types.
//!
//! Provides a backend-agnostic description of tables, columns, constraints and
//! indexes. The same `Schema` value drives the embedded store layout, the
//! constraint checks in `Session`, and the SQL DDL exporter.

use std::collections::{BTreeMap, BTreeSet};

/// Logical column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    /// Bounded string, `VARCHAR(n)`
    Varchar(u32),
    Text,
    Boolean,
    /// Naive timestamp (no time zone)
    Timestamp,
    /// Type name carried through from reflection without interpretation
    Other(String),
}

impl ColumnType {
    /// Returns the Cozo type name for this column type.
    ///
    /// Timestamps are stored as microseconds since the Unix epoch.
    pub fn cozo_type(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Timestamp => "Int",
            ColumnType::Varchar(_) | ColumnType::Text => "String",
            ColumnType::Boolean => "Bool",
            ColumnType::Other(_) => "Any",
        }
    }
}

/// Server-side default applied when a column is omitted on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    CurrentTimestamp,
    /// Default expression reflected from a live database
    Raw(String),
}

/// Referential action for `ON DELETE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
    NoAction,
}

/// Reference from a column to a column of another (or the same) table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
    pub indexed: bool,
    pub default: Option<DefaultValue>,
    /// Refreshed to the current time on every update
    pub on_update_now: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// A nullable column with no constraints.
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable: true,
            primary_key: false,
            autoincrement: false,
            unique: false,
            indexed: false,
            default: None,
            on_update_now: false,
            foreign_key: None,
        }
    }

    /// Auto-increment integer primary key.
    pub fn id() -> Self {
        Self {
            nullable: false,
            primary_key: true,
            autoincrement: true,
            ..Self::new("id", ColumnType::Integer)
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn on_update_now(mut self) -> Self {
        self.on_update_now = true;
        self
    }

    pub fn references(mut self, table: &str, column: &str, on_delete: OnDelete) -> Self {
        self.foreign_key = Some(ForeignKey {
            table: table.to_string(),
            column: column.to_string(),
            on_delete,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl Table {
    /// Build a table, deriving one `ix_<table>_<column>` index per indexed column.
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        let indexes = columns
            .iter()
            .filter(|c| c.indexed)
            .map(|c| Index {
                name: format!("ix_{}_{}", name, c.name),
                table: name.to_string(),
                columns: vec![c.name.clone()],
                unique: c.unique,
            })
            .collect();

        Self {
            name: name.to_string(),
            columns,
            indexes,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The single-column primary key, if the table has one.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Columns forming the storage key: the primary key, or every column for
    /// pure association tables.
    pub fn key_columns(&self) -> Vec<&Column> {
        match self.primary_key() {
            Some(pk) => vec![pk],
            None => self.columns.iter().collect(),
        }
    }

    pub fn value_columns(&self) -> Vec<&Column> {
        match self.primary_key() {
            Some(_) => self.columns.iter().filter(|c| !c.primary_key).collect(),
            None => Vec::new(),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c, fk)))
    }
}

/// An incoming reference: `table.column` points at the table being asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub table: &'a Table,
    pub column: &'a Column,
    /// Column of the referenced table
    pub target_column: &'a str,
    pub on_delete: OnDelete,
}

/// Read-only collection of tables, kept sorted by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new(mut tables: Vec<Table>) -> Self {
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Self { tables }
    }

    /// All tables, sorted by name.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Every foreign key in the schema that points at `table`.
    pub fn referencing(&self, table: &str) -> Vec<Reference<'_>> {
        self.tables
            .iter()
            .flat_map(|t| {
                t.foreign_keys()
                    .filter(|(_, fk)| fk.table == table)
                    .map(move |(column, fk)| Reference {
                        table: t,
                        column,
                        target_column: fk.column.as_str(),
                        on_delete: fk.on_delete,
                    })
            })
            .collect()
    }

    /// Tables ordered so that every table comes after the tables it references.
    ///
    /// Ties are broken by name. Self references are ignored and reference
    /// cycles fall back to name order for the remaining tables.
    pub fn dependency_order(&self) -> Vec<&Table> {
        let mut deps: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for table in &self.tables {
            let entry = deps.entry(table.name.as_str()).or_default();
            for (_, fk) in table.foreign_keys() {
                if fk.table != table.name && self.table(&fk.table).is_some() {
                    entry.insert(fk.table.as_str());
                }
            }
        }

        let mut ordered = Vec::with_capacity(self.tables.len());
        let mut done: BTreeSet<&str> = BTreeSet::new();
        while done.len() < deps.len() {
            let ready = deps
                .iter()
                .find(|(name, d)| !done.contains(*name) && d.iter().all(|x| done.contains(x)))
                .map(|(name, _)| *name)
                .or_else(|| deps.keys().find(|name| !done.contains(*name)).copied());

            match ready {
                Some(name) => {
                    done.insert(name);
                    if let Some(table) = self.table(name) {
                        ordered.push(table);
                    }
                }
                None => break,
            }
        }
        ordered
    }
}
