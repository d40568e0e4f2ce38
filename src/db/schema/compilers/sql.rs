//! SQL DDL compiler.
//!
//! Renders a `Schema` as `CREATE TABLE` / `CREATE INDEX` / `CREATE SEQUENCE`
//! text for PostgreSQL, MySQL and SQLite. Output is deterministic for a given
//! schema and timestamp: tables appear in sorted-name order, indexes follow
//! their table order, and sequences (PostgreSQL only) come last.

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::Serialize;

use crate::db::schema::definition::{Column, ColumnType, DefaultValue, Index, OnDelete, Schema, Table};

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgresql,
    Mysql,
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Postgresql, Dialect::Mysql, Dialect::Sqlite];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgresql => "postgresql",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiler for generating SQL DDL in one dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler {
    dialect: Dialect,
}

impl SqlCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn column_type(&self, column: &Column) -> String {
        if column.autoincrement && self.dialect == Dialect::Postgresql {
            return "SERIAL".to_string();
        }
        match (&column.column_type, self.dialect) {
            (ColumnType::Integer, _) => "INTEGER".to_string(),
            (ColumnType::Varchar(len), _) => format!("VARCHAR({})", len),
            (ColumnType::Text, _) => "TEXT".to_string(),
            (ColumnType::Boolean, Dialect::Mysql) => "BOOL".to_string(),
            (ColumnType::Boolean, _) => "BOOLEAN".to_string(),
            (ColumnType::Timestamp, Dialect::Postgresql) => "TIMESTAMP WITHOUT TIME ZONE".to_string(),
            (ColumnType::Timestamp, _) => "DATETIME".to_string(),
            (ColumnType::Other(name), _) => name.to_uppercase(),
        }
    }

    fn default_clause(&self, default: &DefaultValue) -> String {
        match (default, self.dialect) {
            (DefaultValue::Bool(b), Dialect::Sqlite) => format!("DEFAULT {}", if *b { 1 } else { 0 }),
            (DefaultValue::Bool(b), _) => format!("DEFAULT {}", b),
            (DefaultValue::Int(i), _) => format!("DEFAULT {}", i),
            (DefaultValue::CurrentTimestamp, _) => "DEFAULT CURRENT_TIMESTAMP".to_string(),
            (DefaultValue::Raw(expr), _) => format!("DEFAULT {}", expr),
        }
    }

    fn column_definition(&self, column: &Column) -> String {
        let mut parts = vec![column.name.clone(), self.column_type(column)];
        if let Some(default) = &column.default {
            parts.push(self.default_clause(default));
        }
        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        if column.autoincrement && self.dialect == Dialect::Mysql {
            parts.push("AUTO_INCREMENT".to_string());
        }
        parts.join(" ")
    }

    /// Render a `CREATE TABLE` statement, without a trailing semicolon.
    ///
    /// Unique columns that are also indexed get their uniqueness from the
    /// unique index instead of an inline constraint.
    pub fn create_table(&self, table: &Table) -> String {
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();

        if let Some(pk) = table.primary_key() {
            lines.push(format!("PRIMARY KEY ({})", pk.name));
        }
        for column in table.columns.iter().filter(|c| c.unique && !c.indexed) {
            lines.push(format!("UNIQUE ({})", column.name));
        }
        for (column, fk) in table.foreign_keys() {
            let action = match fk.on_delete {
                OnDelete::Cascade => " ON DELETE CASCADE",
                OnDelete::SetNull => " ON DELETE SET NULL",
                OnDelete::NoAction => "",
            };
            lines.push(format!(
                "FOREIGN KEY({}) REFERENCES {} ({}){}",
                column.name, fk.table, fk.column, action
            ));
        }

        format!(
            "CREATE TABLE {} (\n\t{}\n)",
            table.name,
            lines.join(", \n\t")
        )
    }

    pub fn create_index(&self, index: &Index) -> String {
        format!(
            "CREATE {}INDEX {} ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            index.name,
            index.table,
            index.columns.join(", ")
        )
    }

    /// Sequence names for auto-increment columns without an explicit default.
    ///
    /// Empty for every dialect except PostgreSQL.
    pub fn sequences(&self, schema: &Schema) -> Vec<(String, String)> {
        if self.dialect != Dialect::Postgresql {
            return Vec::new();
        }
        schema
            .tables()
            .iter()
            .flat_map(|t| {
                t.columns
                    .iter()
                    .filter(|c| c.autoincrement && c.default.is_none())
                    .map(move |c| (format!("{}.{}", t.name, c.name), format!("{}_{}_seq", t.name, c.name)))
            })
            .collect()
    }

    /// Render the full dump document for `schema`.
    pub fn render(&self, schema: &Schema, generated_at: NaiveDateTime) -> String {
        let mut out = Vec::new();
        out.push("-- Schema Dump".to_string());
        out.push(format!("-- Generated: {}", generated_at.format("%Y-%m-%dT%H:%M:%S%.6f")));
        out.push(format!("-- Dialect: {}", self.dialect));
        out.push(format!("-- Tables: {}", schema.table_names().join(", ")));
        out.push(String::new());

        out.push("-- Tables".to_string());
        out.push(String::new());
        for table in schema.tables() {
            out.push(format!("-- Table: {}", table.name));
            out.push(format!("{};", self.create_table(table)));
            out.push(String::new());
        }

        let indexes: Vec<&Index> = schema.tables().iter().flat_map(|t| t.indexes.iter()).collect();
        if !indexes.is_empty() {
            out.push("-- Indexes".to_string());
            out.push(String::new());
            for index in indexes {
                out.push(format!("-- Index: {} on {}", index.name, index.table));
                out.push(format!("{};", self.create_index(index)));
                out.push(String::new());
            }
        }

        let sequences = self.sequences(schema);
        if !sequences.is_empty() {
            out.push("-- Sequences".to_string());
            out.push(String::new());
            for (column, name) in sequences {
                out.push(format!("-- Sequence for {}", column));
                out.push(format!("CREATE SEQUENCE IF NOT EXISTS {};", name));
                out.push(String::new());
            }
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::tables::{blog_schema, post_tags, posts, tags, users};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[rstest]
    #[case(Dialect::Postgresql, "id SERIAL NOT NULL")]
    #[case(Dialect::Mysql, "id INTEGER NOT NULL AUTO_INCREMENT")]
    #[case(Dialect::Sqlite, "id INTEGER NOT NULL")]
    fn test_primary_key_per_dialect(#[case] dialect: Dialect, #[case] expected: &str) {
        let ddl = SqlCompiler::new(dialect).create_table(&users());
        assert!(ddl.contains(expected), "{}", ddl);
        assert!(ddl.contains("PRIMARY KEY (id)"));
    }

    #[rstest]
    #[case(Dialect::Postgresql, "is_active BOOLEAN DEFAULT true")]
    #[case(Dialect::Mysql, "is_active BOOL DEFAULT true")]
    #[case(Dialect::Sqlite, "is_active BOOLEAN DEFAULT 1")]
    fn test_boolean_default_per_dialect(#[case] dialect: Dialect, #[case] expected: &str) {
        let ddl = SqlCompiler::new(dialect).create_table(&users());
        assert!(ddl.contains(expected), "{}", ddl);
    }

    #[test]
    fn test_postgres_posts_table() {
        let ddl = SqlCompiler::new(Dialect::Postgresql).create_table(&posts());
        assert!(ddl.starts_with("CREATE TABLE posts (\n\tid SERIAL NOT NULL, \n"));
        assert!(ddl.contains("title VARCHAR(200) NOT NULL"));
        assert!(ddl.contains("published_at TIMESTAMP WITHOUT TIME ZONE, "));
        assert!(ddl.contains("view_count INTEGER DEFAULT 0"));
        assert!(ddl.contains("FOREIGN KEY(author_id) REFERENCES users (id) ON DELETE CASCADE"));
        assert!(ddl.ends_with(")"));
    }

    #[test]
    fn test_link_table_has_no_primary_key() {
        let ddl = SqlCompiler::new(Dialect::Sqlite).create_table(&post_tags());
        assert!(!ddl.contains("PRIMARY KEY"));
        assert!(ddl.contains("FOREIGN KEY(post_id) REFERENCES posts (id) ON DELETE CASCADE"));
        assert!(ddl.contains("FOREIGN KEY(tag_id) REFERENCES tags (id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_unique_index_statement() {
        let tags = tags();
        let compiler = SqlCompiler::new(Dialect::Postgresql);
        let rendered: Vec<_> = tags.indexes.iter().map(|i| compiler.create_index(i)).collect();
        assert_eq!(
            rendered,
            vec![
                "CREATE INDEX ix_tags_id ON tags (id)",
                "CREATE UNIQUE INDEX ix_tags_name ON tags (name)",
                "CREATE UNIQUE INDEX ix_tags_slug ON tags (slug)",
            ]
        );
    }

    #[test]
    fn test_sequences_only_for_postgres() {
        let schema = blog_schema();
        let pg = SqlCompiler::new(Dialect::Postgresql).sequences(&schema);
        let names: Vec<_> = pg.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["comments_id_seq", "posts_id_seq", "tags_id_seq", "users_id_seq"]
        );
        assert!(SqlCompiler::new(Dialect::Mysql).sequences(&schema).is_empty());
        assert!(SqlCompiler::new(Dialect::Sqlite).sequences(&schema).is_empty());
    }

    #[test]
    fn test_render_document_order() {
        let doc = SqlCompiler::new(Dialect::Postgresql).render(&blog_schema(), generated_at());
        assert!(doc.starts_with("-- Schema Dump\n-- Generated: 2024-01-02T03:04:05.000000\n"));
        assert!(doc.contains("-- Dialect: postgresql\n"));
        assert!(doc.contains("-- Tables: comments, post_tags, posts, tags, users\n"));

        let tables = doc.find("-- Tables\n").unwrap();
        let indexes = doc.find("-- Indexes\n").unwrap();
        let sequences = doc.find("-- Sequences\n").unwrap();
        assert!(tables < indexes && indexes < sequences);

        let positions: Vec<_> = ["comments", "post_tags", "posts", "tags", "users"]
            .iter()
            .map(|t| doc.find(&format!("-- Table: {}\n", t)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(doc.contains("-- Index: ix_users_email on users\nCREATE UNIQUE INDEX ix_users_email ON users (email);"));
        assert!(doc.contains("-- Sequence for users.id\nCREATE SEQUENCE IF NOT EXISTS users_id_seq;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let compiler = SqlCompiler::new(Dialect::Mysql);
        let a = compiler.render(&blog_schema(), generated_at());
        let b = compiler.render(&blog_schema(), generated_at());
        assert_eq!(a, b);
        assert!(!a.contains("-- Sequences"));
    }
}
