//! Low-level query execution
//!
//! Statement execution and row scanning against one borrowed connection,
//! with no knowledge of entity shapes. Three scan shapes are supported:
//! many rows into a growable collection, exactly one row onto a struct
//! destination, and exactly one row onto a scalar destination.

#![allow(clippy::result_large_err)]

use crate::errors::{statement_error, Result};
use crate::repo::query::FindQuery;
use medley_core::errors::{MedleyError, MedleyErrorKind};
use rusqlite::types::{FromSql, Value};
use rusqlite::{params_from_iter, Connection, Row};

/// Wrap a query so it yields a single total-row count
pub fn build_count_query(query: &str) -> String {
    format!("SELECT COUNT(*) as count FROM ({}) as temp", query)
}

/// Executes statements against a borrowed connection handle.
///
/// The handle is expected to belong to a caller-opened transaction; the
/// executor never commits, rolls back, or outlives it.
#[derive(Clone, Copy)]
pub struct Executor<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Executor<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Run a mutating statement, returning the affected row count
    pub fn execute(&self, sql: &str, args: &[Value]) -> Result<usize> {
        self.conn
            .execute(sql, params_from_iter(args.iter()))
            .map_err(|e| statement_error(sql, args, e))
    }

    /// The identity assigned by the most recent INSERT on this connection
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Prepare a statement for reuse across a batch
    pub fn prepare(&self, sql: &str) -> rusqlite::Result<rusqlite::Statement<'conn>> {
        self.conn.prepare(sql)
    }

    /// Scan every row into a Vec via the supplied row mapper.
    ///
    /// Zero rows yields an empty Vec, never an error. The cursor is
    /// dropped on every exit path, and mid-iteration driver errors
    /// surface through `rows.next()`.
    pub fn query_vec<T>(
        &self,
        sql: &str,
        args: &[Value],
        mut f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| statement_error(sql, args, e))?;
        let mut rows = stmt
            .query(params_from_iter(args.iter()))
            .map_err(|e| statement_error(sql, args, e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| statement_error(sql, args, e))? {
            out.push(f(row).map_err(|e| statement_error(sql, args, e))?);
        }

        Ok(out)
    }

    /// Scan exactly one row onto a struct-shaped destination.
    ///
    /// Zero rows is `NotFound`, distinguishable from scan/type errors
    /// which surface as `Persistence`.
    pub fn query_one<T>(
        &self,
        sql: &str,
        args: &[Value],
        f: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| statement_error(sql, args, e))?;
        let mut rows = stmt
            .query(params_from_iter(args.iter()))
            .map_err(|e| statement_error(sql, args, e))?;

        match rows.next().map_err(|e| statement_error(sql, args, e))? {
            Some(row) => f(row).map_err(|e| statement_error(sql, args, e)),
            None => Err(MedleyError::new(MedleyErrorKind::NotFound)
                .with_op("query_one")
                .with_statement(sql, format!("{:?}", args))),
        }
    }

    /// Scan the first row's first column onto a scalar destination.
    ///
    /// Zero rows yields `None`, never an error.
    pub fn query_scalar<T: FromSql>(&self, sql: &str, args: &[Value]) -> Result<Option<T>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| statement_error(sql, args, e))?;
        let mut rows = stmt
            .query(params_from_iter(args.iter()))
            .map_err(|e| statement_error(sql, args, e))?;

        match rows.next().map_err(|e| statement_error(sql, args, e))? {
            Some(row) => Ok(Some(row.get(0).map_err(|e| statement_error(sql, args, e))?)),
            None => Ok(None),
        }
    }

    /// Execute a query wrapped as `SELECT COUNT(*) FROM (query)`.
    ///
    /// No rows is count 0, not an error.
    pub fn run_count_query(&self, sql: &str, args: &[Value]) -> Result<i64> {
        let count = self.query_scalar::<i64>(&build_count_query(sql), args)?;
        Ok(count.unwrap_or(0))
    }

    /// Execute a query projecting a single `id` column.
    ///
    /// No rows is an empty list, not an error.
    pub fn run_ids_query(&self, sql: &str, args: &[Value]) -> Result<Vec<i64>> {
        self.query_vec(sql, args, |row| row.get(0))
    }

    /// Run a composed find query twice: once COUNT-wrapped, once with the
    /// sort/pagination suffix, returning `(ids, total_count)`.
    ///
    /// The two statements share identical filter semantics, so the count
    /// reflects the unpaginated filtered set. They are not one atomic
    /// snapshot; consistency between them is whatever the caller's
    /// enclosing transaction provides.
    pub fn execute_find_query(
        &self,
        owner_table: &str,
        query: &FindQuery,
    ) -> Result<(Vec<i64>, i64)> {
        let body = query.build_body(owner_table);
        let with_clause = query.build_with_clause();

        let count_query = format!("{}{}", with_clause, build_count_query(&body));
        let ids_query = format!("{}{}{}", with_clause, body, query.sort_and_pagination());

        let count = self.run_count_query_raw(&count_query, query.args())?;
        let ids = self.run_ids_query(&ids_query, query.args())?;

        Ok((ids, count))
    }

    // run_count_query for an already COUNT-wrapped statement
    fn run_count_query_raw(&self, sql: &str, args: &[Value]) -> Result<i64> {
        let count = self.query_scalar::<i64>(sql, args)?;
        Ok(count.unwrap_or(0))
    }
}
