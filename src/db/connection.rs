//! Embedded store connection management.

use std::path::Path;

use cozo::{DataValue, DbInstance, NamedRows, ScriptMutability};
use tracing::{debug, info};

use super::backend::{CreateStatus, DatabaseBackend};
use super::query::Params;
use super::schema::{
    Column, ColumnType, CozoCompiler, Dialect, Schema, Table, compilers::SEQUENCES_RELATION,
};
use super::session::Session;
use super::value::DatabaseValue;
use super::DbError;

/// A CozoDB instance together with the schema it stores.
pub struct Database {
    db: DbInstance,
    schema: Schema,
    name: &'static str,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.name)
            .field("tables", &self.schema.table_names())
            .finish()
    }
}

impl Database {
    /// Open a CozoDB database backed by SQLite storage.
    pub fn open_sqlite(path: &Path, schema: Schema) -> Result<Self, DbError> {
        let db = DbInstance::new("sqlite", path, "").map_err(|e| DbError::OpenFailed {
            path: path.display().to_string(),
            message: format!("{:?}", e),
        })?;
        info!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            db,
            schema,
            name: "CozoSqlite",
        })
    }

    /// Create an in-memory database instance.
    pub fn open_mem(schema: Schema) -> Result<Self, DbError> {
        let db = DbInstance::new("mem", "", "").map_err(|e| DbError::OpenFailed {
            path: ":memory:".to_string(),
            message: format!("{:?}", e),
        })?;
        Ok(Self {
            db,
            schema,
            name: "CozoMem",
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn instance(&self) -> &DbInstance {
        &self.db
    }

    /// Start a unit of work.
    ///
    /// Reading sessions never block each other or writers. A session that has
    /// started writing holds the store's write transaction until it commits,
    /// rolls back or is dropped.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    /// Create all relations for this database's own schema.
    pub fn initialize(&self) -> Result<Vec<CreateStatus>, DbError> {
        self.create_schema(&self.schema)
    }

    fn run(&self, script: &str, params: Params, mutability: ScriptMutability) -> Result<NamedRows, DbError> {
        self.db
            .run_script(script, params, mutability)
            .map_err(DbError::query)
    }

    fn relation_names(&self) -> Result<Vec<String>, DbError> {
        let rows = self.run("::relations", Params::new(), ScriptMutability::Immutable)?;
        Ok(rows
            .rows
            .iter()
            .filter_map(|row| row.first().and_then(DataValue::as_string))
            .collect())
    }

    fn reflect_relation(&self, name: &str) -> Result<Table, DbError> {
        let rows = self.run(
            &format!("::columns {}", name),
            Params::new(),
            ScriptMutability::Immutable,
        )?;

        let mut keys = Vec::new();
        let mut columns = Vec::with_capacity(rows.rows.len());
        for row in &rows.rows {
            let column_name = row.first().and_then(DataValue::as_string).ok_or_else(|| {
                DbError::MissingColumn {
                    name: "column".to_string(),
                }
            })?;
            let is_key = row.get(1).and_then(DataValue::as_bool).unwrap_or(false);
            let type_name = row.get(3).and_then(DataValue::as_string).unwrap_or_default();

            let (base, nullable) = match type_name.strip_suffix('?') {
                Some(base) => (base.to_string(), true),
                None => (type_name.clone(), false),
            };
            let column_type = match base.as_str() {
                "Int" => ColumnType::Integer,
                "String" => ColumnType::Text,
                "Bool" => ColumnType::Boolean,
                other => ColumnType::Other(other.to_string()),
            };

            let mut column = Column::new(&column_name, column_type);
            column.nullable = nullable;
            if is_key {
                keys.push(column_name);
            }
            columns.push(column);
        }

        // A single integer key is treated as an auto-increment primary key;
        // multi-column keys are association tables.
        if let [key] = keys.as_slice()
            && let Some(column) = columns.iter_mut().find(|c| &c.name == key)
            && column.column_type == ColumnType::Integer
        {
            column.primary_key = true;
            column.autoincrement = true;
            column.nullable = false;
        }

        Ok(Table::new(name, columns))
    }
}

impl DatabaseBackend for Database {
    fn backend_name(&self) -> &'static str {
        self.name
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn relation_exists(&self, name: &str) -> Result<bool, DbError> {
        Ok(self.relation_names()?.iter().any(|r| r == name))
    }

    fn create_schema(&self, schema: &Schema) -> Result<Vec<CreateStatus>, DbError> {
        let existing = self.relation_names()?;
        let mut statuses = Vec::new();

        for (table, script) in CozoCompiler::compile_all(schema.tables()) {
            let created = if existing.contains(&table) {
                false
            } else {
                debug!(relation = %table, "creating relation");
                self.run(&script, Params::new(), ScriptMutability::Mutable)?;
                true
            };
            if table != SEQUENCES_RELATION {
                statuses.push(CreateStatus { table, created });
            }
        }

        Ok(statuses)
    }

    fn reflect_schema(&self) -> Result<Schema, DbError> {
        let tables = self
            .relation_names()?
            .into_iter()
            .filter(|name| name != SEQUENCES_RELATION)
            .map(|name| self.reflect_relation(&name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schema::new(tables))
    }

    fn as_store(&self) -> Option<&Database> {
        Some(self)
    }
}
