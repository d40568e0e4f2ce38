//! Predicate queries over a single table.

use std::collections::BTreeMap;

use cozo::DataValue;

use super::schema::{CozoCompiler, Table};
use super::DbError;

/// Type alias for query parameters.
pub type Params = BTreeMap<String, DataValue>;

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    Eq(String, DataValue),
    IsNull(String),
}

/// Conjunction of column filters with offset pagination.
///
/// Results are ordered by primary key, which follows insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: DataValue) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push(Filter::IsNull(column.to_string()));
        self
    }

    pub fn offset(mut self, skip: usize) -> Self {
        self.offset = Some(skip);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compile to a CozoScript select over `table` plus its parameters.
    pub fn compile(&self, table: &Table) -> Result<(String, Params), DbError> {
        let mut conditions = Vec::with_capacity(self.filters.len());
        let mut params = Params::new();

        for filter in &self.filters {
            let column = match filter {
                Filter::Eq(column, _) | Filter::IsNull(column) => column,
            };
            if table.column(column).is_none() {
                return Err(DbError::UnknownColumn {
                    table: table.name.clone(),
                    column: column.clone(),
                });
            }

            match filter {
                Filter::Eq(column, value) => {
                    let name = format!("p{}", params.len());
                    conditions.push(format!("{} == ${}", column, name));
                    params.insert(name, value.clone());
                }
                Filter::IsNull(column) => conditions.push(format!("is_null({})", column)),
            }
        }

        let mut options = Vec::new();
        if let Some(pk) = table.primary_key() {
            options.push(format!(":order {}", pk.name));
        }
        if let Some(offset) = self.offset {
            options.push(format!(":offset {}", offset));
        }
        if let Some(limit) = self.limit {
            options.push(format!(":limit {}", limit));
        }

        let script = CozoCompiler::compile_select(table, &conditions, &options.join("\n"));
        Ok((script, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::tables::{comments, tags};
    use crate::db::value::{int, text};

    #[test]
    fn test_compile_no_filters() {
        let (script, params) = Query::new().compile(&tags()).unwrap();
        assert!(params.is_empty());
        assert!(script.ends_with("*tags{id, name, slug, description, created_at}\n:order id"));
    }

    #[test]
    fn test_compile_filters_and_pagination() {
        let (script, params) = Query::new()
            .eq("post_id", int(3))
            .is_null("parent_id")
            .offset(5)
            .limit(10)
            .compile(&comments())
            .unwrap();
        assert!(script.contains(", post_id == $p0, is_null(parent_id)\n"));
        assert!(script.ends_with(":order id\n:offset 5\n:limit 10"));
        assert_eq!(params.get("p0"), Some(&int(3)));
    }

    #[test]
    fn test_compile_numbers_params_in_order() {
        let (script, params) = Query::new()
            .eq("name", text("rust"))
            .eq("slug", text("rust"))
            .compile(&tags())
            .unwrap();
        assert!(script.contains("name == $p0, slug == $p1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_compile_unknown_column() {
        let err = Query::new().eq("nope", int(1)).compile(&tags()).unwrap_err();
        assert!(matches!(err, DbError::UnknownColumn { column, .. } if column == "nope"));
    }
}
