//! Read the deployed schema from a live PostgreSQL database.
//!
//! Queries `information_schema` and `pg_indexes` for the `public` schema.
//! Identifier columns are cast to `text` so they decode as `String`.

use std::collections::BTreeSet;

use postgres::Client;

use crate::db::schema::{Column, ColumnType, DefaultValue, ForeignKey, Index, OnDelete, Schema, Table};
use crate::db::DbError;

/// Build a `Schema` from every base table in the `public` schema.
pub fn reflect_schema(client: &mut Client) -> Result<Schema, DbError> {
    let rows = client
        .query(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = 'public'
              AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
            &[],
        )
        .map_err(DbError::query)?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.get(0);
        tables.push(reflect_table(client, &name)?);
    }
    Ok(Schema::new(tables))
}

fn reflect_table(client: &mut Client, table_name: &str) -> Result<Table, DbError> {
    let primary_keys = key_columns(client, table_name, "PRIMARY KEY")?;
    let unique_columns = key_columns(client, table_name, "UNIQUE")?;
    let foreign_keys = foreign_keys(client, table_name)?;
    let indexes = indexes(client, table_name)?;

    let rows = client
        .query(
            r#"
            SELECT
                column_name::text,
                data_type::text,
                character_maximum_length::int4,
                is_nullable::text,
                column_default::text
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1
            ORDER BY ordinal_position
            "#,
            &[&table_name],
        )
        .map_err(DbError::query)?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.get(0);
        let data_type: String = row.get(1);
        let max_length: Option<i32> = row.get(2);
        let is_nullable: String = row.get(3);
        let column_default: Option<String> = row.get(4);

        let mut column = Column::new(&name, column_type(&data_type, max_length));
        column.nullable = is_nullable == "YES";
        column.primary_key = primary_keys.contains(&name);

        match column_default.as_deref().map(str::trim) {
            Some(d) if d.starts_with("nextval(") => column.autoincrement = true,
            Some(d) => column.default = Some(parse_default(d)),
            None => {}
        }

        column.foreign_key = foreign_keys
            .iter()
            .find(|(col, _)| col == &name)
            .map(|(_, fk)| fk.clone());
        column.indexed = indexes.iter().any(|i| i.columns == [name.clone()]);
        column.unique = unique_columns.contains(&name)
            || indexes.iter().any(|i| i.unique && i.columns == [name.clone()]);

        columns.push(column);
    }

    // Keep the deployed index names rather than the derived ones.
    let mut table = Table::new(table_name, columns);
    table.indexes = indexes;
    Ok(table)
}

fn column_type(data_type: &str, max_length: Option<i32>) -> ColumnType {
    match data_type {
        "integer" => ColumnType::Integer,
        "character varying" => match max_length {
            Some(len) if len > 0 => ColumnType::Varchar(len as u32),
            _ => ColumnType::Text,
        },
        "text" => ColumnType::Text,
        "boolean" => ColumnType::Boolean,
        "timestamp without time zone" => ColumnType::Timestamp,
        other => ColumnType::Other(other.to_string()),
    }
}

fn parse_default(default: &str) -> DefaultValue {
    match default {
        "true" => DefaultValue::Bool(true),
        "false" => DefaultValue::Bool(false),
        "now()" | "CURRENT_TIMESTAMP" => DefaultValue::CurrentTimestamp,
        other => match other.parse::<i64>() {
            Ok(i) => DefaultValue::Int(i),
            Err(_) => DefaultValue::Raw(other.to_string()),
        },
    }
}

fn key_columns(
    client: &mut Client,
    table_name: &str,
    constraint_type: &str,
) -> Result<BTreeSet<String>, DbError> {
    let rows = client
        .query(
            r#"
            SELECT kcu.column_name::text
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            WHERE tc.constraint_type = $2
                AND tc.table_schema = 'public'
                AND tc.table_name = $1
            "#,
            &[&table_name, &constraint_type],
        )
        .map_err(DbError::query)?;

    Ok(rows.iter().map(|r| r.get(0)).collect())
}

fn foreign_keys(client: &mut Client, table_name: &str) -> Result<Vec<(String, ForeignKey)>, DbError> {
    let rows = client
        .query(
            r#"
            SELECT
                kcu.column_name::text,
                ccu.table_name::text,
                ccu.column_name::text,
                rc.delete_rule::text
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            JOIN information_schema.constraint_column_usage ccu
                ON tc.constraint_name = ccu.constraint_name
                AND tc.table_schema = ccu.table_schema
            JOIN information_schema.referential_constraints rc
                ON tc.constraint_name = rc.constraint_name
                AND tc.table_schema = rc.constraint_schema
            WHERE tc.constraint_type = 'FOREIGN KEY'
                AND tc.table_schema = 'public'
                AND tc.table_name = $1
            ORDER BY kcu.column_name
            "#,
            &[&table_name],
        )
        .map_err(DbError::query)?;

    Ok(rows
        .iter()
        .map(|row| {
            let column: String = row.get(0);
            let delete_rule: String = row.get(3);
            let on_delete = match delete_rule.as_str() {
                "CASCADE" => OnDelete::Cascade,
                "SET NULL" => OnDelete::SetNull,
                _ => OnDelete::NoAction,
            };
            (
                column,
                ForeignKey {
                    table: row.get(1),
                    column: row.get(2),
                    on_delete,
                },
            )
        })
        .collect())
}

/// Indexes that do not back a primary-key or unique constraint.
fn indexes(client: &mut Client, table_name: &str) -> Result<Vec<Index>, DbError> {
    let rows = client
        .query(
            r#"
            SELECT
                i.indexname::text,
                i.indexdef
            FROM pg_indexes i
            WHERE i.schemaname = 'public'
              AND i.tablename = $1
              AND NOT EXISTS (
                  SELECT 1 FROM information_schema.table_constraints tc
                  WHERE tc.constraint_name = i.indexname
                    AND tc.table_schema = 'public'
              )
            ORDER BY i.indexname
            "#,
            &[&table_name],
        )
        .map_err(DbError::query)?;

    Ok(rows
        .iter()
        .map(|row| {
            let name: String = row.get(0);
            let indexdef: String = row.get(1);
            Index {
                name,
                table: table_name.to_string(),
                unique: indexdef.to_uppercase().contains("UNIQUE INDEX"),
                columns: parse_index_columns(&indexdef),
            }
        })
        .collect())
}

/// Parse column names from an index definition.
///
/// `CREATE UNIQUE INDEX ix_users_email ON public.users USING btree (email)`
/// yields `["email"]`.
pub fn parse_index_columns(indexdef: &str) -> Vec<String> {
    if let Some(start) = indexdef.rfind('(')
        && let Some(end) = indexdef.rfind(')')
        && start < end
    {
        return indexdef[start + 1..end]
            .split(',')
            .map(|s| s.trim().trim_matches('"').to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CREATE INDEX ix_posts_id ON public.posts USING btree (id)", vec!["id"])]
    #[case("CREATE UNIQUE INDEX \"ix_tags_name\" ON public.tags USING btree (\"name\")", vec!["name"])]
    #[case("CREATE INDEX ix_multi ON public.t USING btree (a, b)", vec!["a", "b"])]
    #[case("garbage", vec![])]
    fn test_parse_index_columns(#[case] def: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_index_columns(def), expected);
    }

    #[rstest]
    #[case("integer", None, ColumnType::Integer)]
    #[case("character varying", Some(50), ColumnType::Varchar(50))]
    #[case("character varying", None, ColumnType::Text)]
    #[case("boolean", None, ColumnType::Boolean)]
    #[case("timestamp without time zone", None, ColumnType::Timestamp)]
    #[case("jsonb", None, ColumnType::Other("jsonb".to_string()))]
    fn test_column_type(
        #[case] data_type: &str,
        #[case] len: Option<i32>,
        #[case] expected: ColumnType,
    ) {
        assert_eq!(column_type(data_type, len), expected);
    }

    #[rstest]
    #[case("true", DefaultValue::Bool(true))]
    #[case("0", DefaultValue::Int(0))]
    #[case("now()", DefaultValue::CurrentTimestamp)]
    #[case("'draft'::character varying", DefaultValue::Raw("'draft'::character varying".to_string()))]
    fn test_parse_default(#[case] input: &str, #[case] expected: DefaultValue) {
        assert_eq!(parse_default(input), expected);
    }
}
