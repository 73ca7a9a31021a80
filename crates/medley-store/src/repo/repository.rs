//! Generic entity repository
//!
//! One implementation of CRUD shared by every entity type, driven by the
//! entity's static schema descriptor. All operations run against the
//! caller's transaction; commit and rollback stay with the caller.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;

use crate::errors::Result;
use crate::repo::executor::Executor;
use crate::repo::query::FindQuery;
use crate::schema::{Entity, EntityPatch, TableSpec};
use medley_core::errors::{MedleyError, MedleyErrorKind};
use rusqlite::types::Value;
use rusqlite::Connection;

/// Per-entity CRUD over the query executor.
///
/// Stateless apart from the borrowed connection; construct one per
/// transaction scope and drop it with the scope.
pub struct Repository<'conn, E: Entity> {
    ex: Executor<'conn>,
    _entity: PhantomData<E>,
}

impl<'conn, E: Entity> Repository<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            ex: Executor::new(conn),
            _entity: PhantomData,
        }
    }

    fn spec() -> &'static TableSpec {
        E::spec()
    }

    /// The executor, for finder-level custom scans
    pub fn executor(&self) -> Executor<'conn> {
        self.ex
    }

    /// Fetch exactly one entity by identity.
    ///
    /// # Errors
    ///
    /// - `NotFound` — no row with this id exists
    pub fn get_by_id(&self, id: i64) -> Result<E> {
        let spec = Self::spec();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
            spec.select_list(),
            spec.table,
            spec.id_column
        );

        self.ex
            .query_one(&sql, &[Value::Integer(id)], E::from_row)
            .map_err(|e| {
                if e.kind() == MedleyErrorKind::NotFound {
                    MedleyError::new(MedleyErrorKind::NotFound)
                        .with_op("get_by_id")
                        .with_table(spec.table)
                        .with_entity_id(id)
                } else {
                    e
                }
            })
    }

    /// True iff exactly one row matches the identity column.
    ///
    /// Uses the COUNT-wrapping path for uniformity with the find queries.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let spec = Self::spec();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
            spec.id_column, spec.table, spec.id_column
        );

        let count = self.ex.run_count_query(&sql, &[Value::Integer(id)])?;
        Ok(count == 1)
    }

    /// Insert a new entity and return the stored row.
    ///
    /// The column list comes from the schema descriptor (identity
    /// excluded). After the insert the full row is re-fetched, so columns
    /// filled by defaults or triggers are visible to the caller.
    pub fn insert(&self, obj: &E) -> Result<E> {
        let spec = Self::spec();
        let values = obj.bind();
        if values.len() != spec.columns.len() {
            return Err(MedleyError::new(MedleyErrorKind::Internal)
                .with_op("insert")
                .with_table(spec.table)
                .with_message(format!(
                    "bind() yielded {} values for {} descriptor columns",
                    values.len(),
                    spec.columns.len()
                )));
        }

        let columns: Vec<&str> = spec.columns.iter().map(|c| c.name).collect();
        let placeholders: Vec<&str> = spec.columns.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.table,
            columns.join(", "),
            placeholders.join(", ")
        );

        self.ex.execute(&sql, &values)?;
        let id = self.ex.last_insert_rowid();

        tracing::debug!(table = spec.table, id, "inserted entity");

        self.get_by_id(id)
    }

    /// Replace every descriptor column of an existing row.
    ///
    /// # Errors
    ///
    /// - `NotExist` — the id fails the existence pre-check, raised before
    ///   the UPDATE is attempted
    pub fn update(&self, id: i64, obj: &E) -> Result<()> {
        let spec = Self::spec();
        self.check_exists(id, "update")?;

        let values = obj.bind();
        if values.len() != spec.columns.len() {
            return Err(MedleyError::new(MedleyErrorKind::Internal)
                .with_op("update")
                .with_table(spec.table)
                .with_message(format!(
                    "bind() yielded {} values for {} descriptor columns",
                    values.len(),
                    spec.columns.len()
                )));
        }

        let sets: Vec<String> = spec
            .columns
            .iter()
            .map(|c| format!("{} = ?", c.name))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            spec.table,
            sets.join(", "),
            spec.id_column
        );

        let mut args = values;
        args.push(Value::Integer(id));
        self.ex.execute(&sql, &args)?;

        Ok(())
    }

    /// Update only the fields flagged present in the patch.
    ///
    /// An all-absent patch degenerates to a no-op UPDATE carrying just
    /// the identity predicate, and succeeds.
    ///
    /// # Errors
    ///
    /// - `NotExist` — the id fails the existence pre-check
    /// - `InvalidInput` — an explicit null targets a column the
    ///   descriptor does not flag nullable
    pub fn update_partial(&self, id: i64, patch: &E::Patch) -> Result<()> {
        let spec = Self::spec();
        self.check_exists(id, "update_partial")?;

        let pairs = patch.bind();
        for (column, value) in &pairs {
            if matches!(value, Value::Null) {
                let nullable = spec.column(column).is_some_and(|c| c.nullable);
                if !nullable {
                    return Err(MedleyError::new(MedleyErrorKind::InvalidInput)
                        .with_op("update_partial")
                        .with_table(spec.table)
                        .with_entity_id(id)
                        .with_message(format!("column {} does not accept null", column)));
                }
            }
        }

        let (sql, args) = if pairs.is_empty() {
            // Degenerate form: identity predicate only, touches nothing
            (
                format!(
                    "UPDATE {} SET {} = {} WHERE {} = ?",
                    spec.table, spec.id_column, spec.id_column, spec.id_column
                ),
                vec![Value::Integer(id)],
            )
        } else {
            let sets: Vec<String> = pairs.iter().map(|(c, _)| format!("{} = ?", c)).collect();
            let mut args: Vec<Value> = pairs.into_iter().map(|(_, v)| v).collect();
            args.push(Value::Integer(id));
            (
                format!(
                    "UPDATE {} SET {} WHERE {} = ?",
                    spec.table,
                    sets.join(", "),
                    spec.id_column
                ),
                args,
            )
        };

        self.ex.execute(&sql, &args)?;

        Ok(())
    }

    /// Delete rows one identity at a time, keeping per-id failures
    /// isolated.
    pub fn destroy(&self, ids: &[i64]) -> Result<()> {
        let spec = Self::spec();
        let sql = format!("DELETE FROM {} WHERE {} = ?", spec.table, spec.id_column);

        for &id in ids {
            self.ex.execute(&sql, &[Value::Integer(id)])?;
        }

        tracing::debug!(table = spec.table, count = ids.len(), "destroyed entities");

        Ok(())
    }

    /// Validate that every id in the batch exists, then delete them all.
    ///
    /// One missing id fails the whole batch with `NotExist` and deletes
    /// nothing. The check and the deletes are separate statements, not
    /// one atomic conditional delete; a concurrent delete between them is
    /// an accepted race, bounded by the caller's transaction.
    pub fn destroy_existing(&self, ids: &[i64]) -> Result<()> {
        for &id in ids {
            self.check_exists(id, "destroy_existing")?;
        }

        self.destroy(ids)
    }

    /// Run a composed find query, returning `(ids, total_count)`
    pub fn query(&self, query: &FindQuery) -> Result<(Vec<i64>, i64)> {
        self.ex.execute_find_query(Self::spec().table, query)
    }

    fn check_exists(&self, id: i64, op: &str) -> Result<()> {
        let spec = Self::spec();
        if !self.exists(id)? {
            return Err(MedleyError::new(MedleyErrorKind::NotExist)
                .with_op(op)
                .with_table(spec.table)
                .with_entity_id(id)
                .with_message(format!(
                    "{} {} does not exist in {}",
                    spec.id_column, id, spec.table
                )));
        }
        Ok(())
    }
}
