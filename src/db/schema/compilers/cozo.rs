//! Cozo Datalog compiler.
//!
//! Generates the CozoScript used by the embedded store: `:create` statements for
//! each table and the parameterized `:put`/`:rm`/select scripts issued by
//! `Session`. Parameters are always named `$p0`, `$p1`, ... in column order.

use crate::db::schema::definition::{Column, Table};

/// Relation holding the next id to hand out for each auto-increment table.
pub const SEQUENCES_RELATION: &str = "sequences";

/// Compiler for generating CozoScript from table definitions.
pub struct CozoCompiler;

fn field(column: &Column, key: bool) -> String {
    let nullable = if column.nullable && !key { "?" } else { "" };
    format!("    {}: {}{}", column.name, column.column_type.cozo_type(), nullable)
}

fn names(columns: &[&Column]) -> String {
    columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn params(count: usize, offset: usize) -> String {
    (offset..offset + count)
        .map(|i| format!("$p{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CozoCompiler {
    /// Generate the `:create` statement for a single table.
    ///
    /// Produces output in the format:
    /// ```cozo
    /// :create users {
    ///     id: Int
    ///     =>
    ///     username: String,
    ///     bio: String?
    /// }
    /// ```
    /// Tables without a primary key are keyed on every column and have no `=>`
    /// section. Key columns are never nullable in the store.
    pub fn compile_table(table: &Table) -> String {
        let keys = table
            .key_columns()
            .into_iter()
            .map(|c| field(c, true))
            .collect::<Vec<_>>()
            .join(",\n");
        let values = table
            .value_columns()
            .into_iter()
            .map(|c| field(c, false))
            .collect::<Vec<_>>()
            .join(",\n");

        if values.is_empty() {
            format!(":create {} {{\n{}\n}}", table.name, keys)
        } else {
            format!(":create {} {{\n{}\n    =>\n{}\n}}", table.name, keys, values)
        }
    }

    pub fn compile_sequences() -> String {
        format!(
            ":create {} {{\n    name: String\n    =>\n    next_id: Int\n}}",
            SEQUENCES_RELATION
        )
    }

    /// Generate every `:create` statement the store needs, sequences first.
    pub fn compile_all<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Vec<(String, String)> {
        let mut scripts = vec![(SEQUENCES_RELATION.to_string(), Self::compile_sequences())];
        scripts.extend(
            tables
                .into_iter()
                .map(|t| (t.name.clone(), Self::compile_table(t))),
        );
        scripts
    }

    /// Generate a single-row `:put`, with one parameter per column in table order.
    ///
    /// ```cozo
    /// ?[id, username] <- [[$p0, $p1]]
    /// :put users { id => username }
    /// ```
    pub fn compile_put(table: &Table) -> String {
        let all = table.columns.iter().collect::<Vec<_>>();
        let keys = table.key_columns();
        let values = table.value_columns();

        let spec = if values.is_empty() {
            names(&keys)
        } else {
            format!("{} => {}", names(&keys), names(&values))
        };

        format!(
            "?[{}] <- [[{}]]\n:put {} {{ {} }}",
            names(&all),
            params(all.len(), 0),
            table.name,
            spec
        )
    }

    /// Generate a single-row `:rm` keyed on the table's storage key.
    pub fn compile_remove(table: &Table) -> String {
        let keys = table.key_columns();
        format!(
            "?[{}] <- [[{}]]\n:rm {} {{ {} }}",
            names(&keys),
            params(keys.len(), 0),
            table.name,
            names(&keys)
        )
    }

    /// Generate a `:rm` removing every row where `column == $p0`.
    pub fn compile_remove_where(table: &Table, column: &str) -> String {
        let keys = names(&table.key_columns());
        format!(
            "?[{keys}] := *{table}{{{keys}}}, {column} == $p0\n:rm {table} {{ {keys} }}",
            keys = keys,
            table = table.name,
            column = column,
        )
    }

    /// Generate a select of every column, with caller-supplied body conditions
    /// and trailing options (`:order`, `:limit`, ...).
    pub fn compile_select(table: &Table, conditions: &[String], options: &str) -> String {
        let cols = table.column_names().join(", ");
        let mut body = format!("*{}{{{}}}", table.name, cols);
        for condition in conditions {
            body.push_str(", ");
            body.push_str(condition);
        }

        let mut script = format!("?[{}] := {}", cols, body);
        if !options.is_empty() {
            script.push('\n');
            script.push_str(options);
        }
        script
    }

    /// Select the rows of `target` reachable through an association table.
    ///
    /// `link_from` is matched against `$p0`; `link_to` joins onto `target.id`.
    pub fn compile_select_related(
        link: &Table,
        link_from: &str,
        link_to: &str,
        target: &Table,
    ) -> String {
        let cols = target.column_names().join(", ");
        format!(
            "?[{cols}] := *{link}{{{link_from}: link_src, {link_to}: id}}, link_src == $p0, *{target}{{{cols}}}\n:order id",
            cols = cols,
            link = link.name,
            link_from = link_from,
            link_to = link_to,
            target = target.name,
        )
    }
}
