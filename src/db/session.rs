//! Unit of work over the embedded store.
//!
//! Reads run as immutable scripts against committed data until the session
//! first writes. The first `insert`, `update`, `delete`, `insert_link` or
//! `remove_link` opens one CozoDB write transaction, and every later read and
//! write goes through it, so a session always sees its own pending changes.
//! The transaction is committed by [`Session::commit`], discarded by
//! [`Session::rollback`], and aborted when the session is dropped. A session
//! that only reads never holds the write transaction.
//!
//! CozoDB stores plain relations, so the relational rules declared in the
//! schema are enforced here before each write:
//! - omitted columns get their declared default, or NULL
//! - NOT NULL, UNIQUE and FOREIGN KEY constraints
//! - `ON DELETE` actions on every incoming foreign key
//! - `updated_at`-style columns are refreshed on update

use chrono::Utc;
use cozo::{DataValue, MultiTransaction, NamedRows, ScriptMutability};
use tracing::{debug, warn};

use super::connection::Database;
use super::query::{Params, Query};
use super::record::{Entity, Record};
use super::schema::{ColumnType, CozoCompiler, DefaultValue, OnDelete, Table, compilers::SEQUENCES_RELATION};
use super::value::{display_value, int, null, text, DatabaseValue, Values};
use super::DbError;

pub struct Session<'db> {
    db: &'db Database,
    tx: Option<MultiTransaction>,
}

fn params(values: impl IntoIterator<Item = DataValue>) -> Params {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (format!("p{}", i), v))
        .collect()
}

fn type_accepts(column_type: &ColumnType, value: &DataValue) -> bool {
    match column_type {
        ColumnType::Integer | ColumnType::Timestamp => value.as_i64().is_some(),
        ColumnType::Varchar(_) | ColumnType::Text => value.as_string().is_some(),
        ColumnType::Boolean => value.as_bool().is_some(),
        ColumnType::Other(_) => true,
    }
}

fn expected_name(column_type: &ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "int",
        ColumnType::Timestamp => "timestamp",
        ColumnType::Varchar(_) | ColumnType::Text => "string",
        ColumnType::Boolean => "bool",
        ColumnType::Other(_) => "any",
    }
}

impl<'db> Session<'db> {
    pub(crate) fn new(db: &'db Database) -> Self {
        Self { db, tx: None }
    }

    /// Open the write transaction if this session has not written yet.
    ///
    /// Mutations call this before their constraint checks, so the checks and
    /// the write happen under the same transaction.
    fn begin_write(&mut self) {
        if self.tx.is_none() {
            debug!("opening write transaction");
            self.tx = Some(self.db.instance().multi_transaction(true));
        }
    }

    fn run(&mut self, script: &str, params: Params) -> Result<NamedRows, DbError> {
        debug!(script, "run");
        let result = match &self.tx {
            Some(tx) => tx.run_script(script, params),
            None => self
                .db
                .instance()
                .run_script(script, params, ScriptMutability::Immutable),
        };
        result.map_err(DbError::query)
    }

    fn table(&self, name: &str) -> Result<&'db Table, DbError> {
        let db = self.db;
        db.schema().table(name).ok_or_else(|| DbError::UnknownTable {
            name: name.to_string(),
        })
    }

    /// Commit pending writes. A no-op when nothing has been done yet.
    pub fn commit(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().map_err(DbError::query)?;
            debug!("committed");
        }
        Ok(())
    }

    /// Discard pending writes.
    pub fn rollback(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.abort().map_err(DbError::query)?;
            debug!("rolled back");
        }
        Ok(())
    }

    /// Run a raw read-only CozoScript, inside the write transaction once one is open.
    pub fn run_script(&mut self, script: &str, params: Params) -> Result<Vec<Record>, DbError> {
        Ok(Record::from_rows(self.run(script, params)?))
    }

    // ----- reads -----

    pub fn find_records(&mut self, table: &str, query: &Query) -> Result<Vec<Record>, DbError> {
        let table = self.table(table)?;
        let (script, params) = query.compile(table)?;
        self.run_script(&script, params)
    }

    pub fn find<E: Entity>(&mut self, query: &Query) -> Result<Vec<E>, DbError> {
        self.find_records(E::TABLE, query)?
            .iter()
            .map(E::from_record)
            .collect()
    }

    pub fn get_record(&mut self, table: &str, id: i64) -> Result<Option<Record>, DbError> {
        let pk = self.primary_key_name(table)?;
        let mut records = self.find_records(table, &Query::new().eq(&pk, int(id)))?;
        Ok(records.pop())
    }

    /// Primary-key lookup.
    pub fn get<E: Entity>(&mut self, id: i64) -> Result<Option<E>, DbError> {
        self.get_record(E::TABLE, id)?
            .as_ref()
            .map(E::from_record)
            .transpose()
    }

    /// Rows of `E` linked to `id` through an association table.
    pub fn related<E: Entity>(
        &mut self,
        link: &str,
        from_column: &str,
        to_column: &str,
        id: i64,
    ) -> Result<Vec<E>, DbError> {
        let link = self.table(link)?;
        let target = self.table(E::TABLE)?;
        for column in [from_column, to_column] {
            if link.column(column).is_none() {
                return Err(DbError::UnknownColumn {
                    table: link.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        let script = CozoCompiler::compile_select_related(link, from_column, to_column, target);
        self.run_script(&script, params([int(id)]))?
            .iter()
            .map(E::from_record)
            .collect()
    }

    fn primary_key_name(&self, table: &str) -> Result<String, DbError> {
        let table = self.table(table)?;
        table
            .primary_key()
            .map(|c| c.name.clone())
            .ok_or_else(|| DbError::UnknownColumn {
                table: table.name.clone(),
                column: "id".to_string(),
            })
    }

    fn ids_where(&mut self, table: &Table, column: &str, value: &DataValue) -> Result<Vec<i64>, DbError> {
        let pk = match table.primary_key() {
            Some(pk) => pk.name.clone(),
            None => return Ok(Vec::new()),
        };
        let script = format!(
            "?[{pk}] := *{table}{{{pk}, {column}}}, {column} == $p0",
            pk = pk,
            table = table.name,
            column = column
        );
        let rows = self.run(&script, params([value.clone()]))?;
        Ok(rows
            .rows
            .iter()
            .filter_map(|r| r.first().and_then(DataValue::as_i64))
            .collect())
    }

    fn exists_where(&mut self, table: &Table, column: &str, value: &DataValue) -> Result<bool, DbError> {
        let script = format!(
            "?[{column}] := *{table}{{{column}}}, {column} == $p0\n:limit 1",
            table = table.name,
            column = column
        );
        Ok(!self.run(&script, params([value.clone()]))?.rows.is_empty())
    }

    // ----- writes -----

    fn next_id(&mut self, table: &Table, explicit: Option<i64>) -> Result<i64, DbError> {
        let script = format!(
            "?[next_id] := *{}{{name, next_id}}, name == $p0",
            SEQUENCES_RELATION
        );
        let rows = self.run(&script, params([text(&table.name)]))?;
        let current = rows
            .rows
            .first()
            .and_then(|r| r.first())
            .and_then(DataValue::as_i64)
            .unwrap_or(1);

        let id = explicit.unwrap_or(current);
        let next = current.max(id + 1);
        let script = format!(
            "?[name, next_id] <- [[$p0, $p1]]\n:put {} {{ name => next_id }}",
            SEQUENCES_RELATION
        );
        self.run(&script, params([text(&table.name), int(next)]))?;
        Ok(id)
    }

    /// Fill defaults, reject unknown columns and check NOT NULL and types.
    ///
    /// Returns one value per column in table order.
    fn complete_row(&self, table: &Table, mut values: Values) -> Result<Vec<DataValue>, DbError> {
        if let Some(unknown) = values.keys().find(|k| table.column(k).is_none()) {
            return Err(DbError::UnknownColumn {
                table: table.name.clone(),
                column: unknown.clone(),
            });
        }

        let now = Utc::now().timestamp_micros();
        let keyed_on_all = table.primary_key().is_none();
        let mut row = Vec::with_capacity(table.columns.len());

        for column in &table.columns {
            let value = match values.remove(&column.name) {
                Some(value) => value,
                None => match &column.default {
                    Some(DefaultValue::Bool(b)) => DataValue::Bool(*b),
                    Some(DefaultValue::Int(i)) => int(*i),
                    Some(DefaultValue::CurrentTimestamp) => int(now),
                    Some(DefaultValue::Raw(_)) | None => null(),
                },
            };

            if value.is_null() {
                if !column.nullable || keyed_on_all {
                    return Err(DbError::NotNullViolation {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            } else if !type_accepts(&column.column_type, &value) {
                return Err(DbError::TypeMismatch {
                    column: format!("{}.{}", table.name, column.name),
                    expected: expected_name(&column.column_type),
                    found: value.type_name(),
                });
            }
            row.push(value);
        }

        Ok(row)
    }

    /// UNIQUE and FOREIGN KEY checks against committed data plus this session's writes.
    fn check_constraints(&mut self, table: &Table, row: &[DataValue], own_id: Option<i64>) -> Result<(), DbError> {
        for (column, value) in table.columns.iter().zip(row) {
            if value.is_null() {
                continue;
            }

            if column.unique && !column.primary_key {
                let clash = self
                    .ids_where(table, &column.name, value)?
                    .into_iter()
                    .any(|id| Some(id) != own_id);
                if clash {
                    return Err(DbError::UniqueViolation {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        value: display_value(value),
                    });
                }
            }

            if let Some(fk) = &column.foreign_key {
                let target = self.table(&fk.table)?;
                if !self.exists_where(target, &fk.column, value)? {
                    return Err(DbError::ForeignKeyViolation {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        value: display_value(value),
                        target: format!("{}.{}", fk.table, fk.column),
                    });
                }
            }
        }
        Ok(())
    }

    fn put(&mut self, table: &Table, row: Vec<DataValue>) -> Result<(), DbError> {
        let script = CozoCompiler::compile_put(table);
        self.run(&script, params(row))?;
        Ok(())
    }

    /// Insert a row into a table with an auto-increment primary key and return its id.
    pub fn insert(&mut self, table: &str, mut values: Values) -> Result<i64, DbError> {
        let table = self.table(table)?;
        let pk = table.primary_key().ok_or_else(|| DbError::UnknownColumn {
            table: table.name.clone(),
            column: "id".to_string(),
        })?;

        self.begin_write();
        let explicit = values.get(&pk.name).and_then(DataValue::as_i64);
        if let Some(id) = explicit
            && self.get_record(&table.name, id)?.is_some()
        {
            return Err(DbError::UniqueViolation {
                table: table.name.clone(),
                column: pk.name.clone(),
                value: id.to_string(),
            });
        }

        let row_preview = {
            let mut preview = values.clone();
            preview.insert(pk.name.clone(), int(0));
            self.complete_row(table, preview)?
        };
        self.check_constraints(table, &row_preview, None)?;

        let id = self.next_id(table, explicit)?;
        values.insert(pk.name.clone(), int(id));
        let row = self.complete_row(table, values)?;
        self.put(table, row)?;
        debug!(table = %table.name, id, "inserted");
        Ok(id)
    }

    /// Insert a row into an association table (no primary key).
    ///
    /// The row is the whole key, so inserting an existing pair is a no-op.
    pub fn insert_link(&mut self, table: &str, values: Values) -> Result<(), DbError> {
        let table = self.table(table)?;
        self.begin_write();
        let row = self.complete_row(table, values)?;
        self.check_constraints(table, &row, None)?;
        self.put(table, row)?;
        debug!(table = %table.name, "linked");
        Ok(())
    }

    /// Remove an association row. Returns false if it did not exist.
    pub fn remove_link(&mut self, table: &str, values: Values) -> Result<bool, DbError> {
        let table = self.table(table)?;
        self.begin_write();
        let row = self.complete_row(table, values)?;

        let query = table
            .columns
            .iter()
            .zip(row.iter())
            .fold(Query::new(), |q, (c, v)| q.eq(&c.name, v.clone()));
        if self.find_records(&table.name, &query)?.is_empty() {
            return Ok(false);
        }

        let script = CozoCompiler::compile_remove(table);
        self.run(&script, params(row))?;
        Ok(true)
    }

    /// Apply `changes` to the row with primary key `id`.
    ///
    /// Columns flagged `on_update_now` are refreshed unless `changes` sets them,
    /// and never move backwards. Returns false if the row does not exist.
    pub fn update(&mut self, table: &str, id: i64, changes: Values) -> Result<bool, DbError> {
        let table = self.table(table)?;
        self.begin_write();
        let current = match self.get_record(&table.name, id)? {
            Some(record) => record,
            None => return Ok(false),
        };

        let now = Utc::now().timestamp_micros();
        let mut values = current.to_values();
        for column in table.columns.iter().filter(|c| c.on_update_now) {
            if !changes.contains_key(&column.name) {
                let previous = current.opt_int(&column.name)?.unwrap_or(i64::MIN);
                values.insert(column.name.clone(), int(now.max(previous)));
            }
        }
        for (column, value) in changes {
            if table.column(&column).is_some_and(|c| c.primary_key) {
                continue;
            }
            values.insert(column, value);
        }

        let row = self.complete_row(table, values)?;
        self.check_constraints(table, &row, Some(id))?;
        self.put(table, row)?;
        debug!(table = %table.name, id, "updated");
        Ok(true)
    }

    /// Delete the row with primary key `id` and apply the `ON DELETE` action of
    /// every foreign key that references it.
    ///
    /// Returns false, with no changes, if the row does not exist. The row is
    /// removed before its dependents, so reference cycles terminate.
    pub fn delete(&mut self, table: &str, id: i64) -> Result<bool, DbError> {
        let table = self.table(table)?;
        self.begin_write();
        let record = match self.get_record(&table.name, id)? {
            Some(record) => record,
            None => return Ok(false),
        };

        let db = self.db;
        let references = db.schema().referencing(&table.name);

        for reference in references.iter().filter(|r| r.on_delete == OnDelete::NoAction) {
            let key = record.get(reference.target_column)?;
            if !key.is_null() && self.exists_where(reference.table, &reference.column.name, key)? {
                return Err(DbError::ForeignKeyViolation {
                    table: reference.table.name.clone(),
                    column: reference.column.name.clone(),
                    value: display_value(key),
                    target: format!("{}.{}", table.name, reference.target_column),
                });
            }
        }

        let script = CozoCompiler::compile_remove(table);
        self.run(&script, params([int(id)]))?;
        debug!(table = %table.name, id, "deleted");

        for reference in &references {
            let key = record.get(reference.target_column)?;
            if key.is_null() {
                continue;
            }
            let child = reference.table;
            let column = &reference.column.name;
            match reference.on_delete {
                OnDelete::Cascade if child.primary_key().is_some() => {
                    for child_id in self.ids_where(child, column, key)? {
                        self.delete(&child.name, child_id)?;
                    }
                }
                OnDelete::Cascade => {
                    let script = CozoCompiler::compile_remove_where(child, column);
                    self.run(&script, params([key.clone()]))?;
                }
                OnDelete::SetNull => {
                    for child_id in self.ids_where(child, column, key)? {
                        let changes = Values::from([(column.clone(), null())]);
                        self.update(&child.name, child_id, changes)?;
                    }
                }
                OnDelete::NoAction => {}
            }
        }

        Ok(true)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take()
            && let Err(e) = tx.abort()
        {
            warn!(error = %e, "failed to abort transaction");
        }
    }
}
