//! Relationship-table repositories
//!
//! Four specializations over join tables, all keyed by the owning
//! entity's id:
//! - plain many-to-many joins
//! - ordered "primary-first" file relations
//! - flat string lists
//! - external-id pairs and caption records
//!
//! Replace is always destroy-then-insert-each, never a diff.

#![allow(clippy::result_large_err)]

use crate::errors::{statement_error, Result};
use crate::repo::executor::Executor;
use medley_core::model::{Caption, ExternalId};
use rusqlite::types::Value;
use rusqlite::Connection;

/// Outcome of one insert-or-ignore attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinInsert {
    /// The pair was new and has been inserted
    Inserted,
    /// The pair already existed; nothing was written
    AlreadyExists,
}

/// Render an `IN` binding list: `(?, ?, ?)`
fn in_binding(len: usize) -> String {
    let marks: Vec<&str> = (0..len).map(|_| "?").collect();
    format!("({})", marks.join(", "))
}

/// Plain many-to-many join table `(owner_id, foreign_id)`
///
/// Uniqueness of the pair is the table's composite key; `insert` surfaces
/// a duplicate as `ConstraintViolation` while `insert_or_ignore` swallows
/// it and reports which occurred.
pub struct JoinRepository<'conn> {
    ex: Executor<'conn>,
    table: &'static str,
    owner_column: &'static str,
    fk_column: &'static str,

    // fields for alternate ordering
    foreign_table: Option<&'static str>,
    order_by: Option<&'static str>,
}

impl<'conn> JoinRepository<'conn> {
    pub fn new(
        conn: &'conn Connection,
        table: &'static str,
        owner_column: &'static str,
        fk_column: &'static str,
    ) -> Self {
        Self {
            ex: Executor::new(conn),
            table,
            owner_column,
            fk_column,
            foreign_table: None,
            order_by: None,
        }
    }

    /// Order `get_ids` by joining through the foreign table, e.g. by the
    /// natural order of a related dimension
    pub fn with_ordering(mut self, foreign_table: &'static str, order_by: &'static str) -> Self {
        self.foreign_table = Some(foreign_table);
        self.order_by = Some(order_by);
        self
    }

    /// Append an explicit ORDER BY to `get_ids` without joining another
    /// table
    pub fn with_order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Foreign ids joined to one owner
    pub fn get_ids(&self, owner_id: i64) -> Result<Vec<i64>> {
        let join_str = match self.foreign_table {
            Some(foreign) => format!(
                " INNER JOIN {} ON {}.id = {}.{}",
                foreign, foreign, self.table, self.fk_column
            ),
            None => String::new(),
        };

        let mut sql = format!(
            "SELECT {}.{} as id FROM {}{} WHERE {}.{} = ?",
            self.table, self.fk_column, self.table, join_str, self.table, self.owner_column
        );

        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        self.ex.run_ids_query(&sql, &[Value::Integer(owner_id)])
    }

    /// Insert joins for each foreign id.
    ///
    /// # Errors
    ///
    /// - `ConstraintViolation` — a pair already exists
    pub fn insert(&self, owner_id: i64, foreign_ids: &[i64]) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            self.table, self.owner_column, self.fk_column
        );

        // One prepared statement reused across the batch
        let mut stmt = self
            .ex
            .prepare(&sql)
            .map_err(|e| statement_error(&sql, &[], e))?;
        for &fk in foreign_ids {
            stmt.execute(rusqlite::params![owner_id, fk]).map_err(|e| {
                statement_error(&sql, &[Value::Integer(owner_id), Value::Integer(fk)], e)
            })?;
        }

        Ok(())
    }

    /// Insert joins, silently skipping pairs that already exist.
    ///
    /// Returns one outcome per foreign id, in input order, so callers can
    /// branch on which pairs were actually new.
    pub fn insert_or_ignore(&self, owner_id: i64, foreign_ids: &[i64]) -> Result<Vec<JoinInsert>> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?) ON CONFLICT ({}, {}) DO NOTHING",
            self.table, self.owner_column, self.fk_column, self.owner_column, self.fk_column
        );

        let mut stmt = self
            .ex
            .prepare(&sql)
            .map_err(|e| statement_error(&sql, &[], e))?;
        let mut outcomes = Vec::with_capacity(foreign_ids.len());
        for &fk in foreign_ids {
            let changed = stmt.execute(rusqlite::params![owner_id, fk]).map_err(|e| {
                statement_error(&sql, &[Value::Integer(owner_id), Value::Integer(fk)], e)
            })?;
            outcomes.push(if changed == 0 {
                JoinInsert::AlreadyExists
            } else {
                JoinInsert::Inserted
            });
        }

        Ok(outcomes)
    }

    /// Delete specific joins for one owner
    pub fn destroy_joins(&self, owner_id: i64, foreign_ids: &[i64]) -> Result<()> {
        if foreign_ids.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "DELETE FROM {} WHERE {} = ? AND {} IN {}",
            self.table,
            self.owner_column,
            self.fk_column,
            in_binding(foreign_ids.len())
        );

        let mut args = Vec::with_capacity(foreign_ids.len() + 1);
        args.push(Value::Integer(owner_id));
        args.extend(foreign_ids.iter().map(|&fk| Value::Integer(fk)));

        self.ex.execute(&sql, &args)?;

        Ok(())
    }

    /// Replace the full join set for one owner: delete-all then insert
    /// each, always `len(foreign_ids) + 1` statements regardless of
    /// overlap with the prior set.
    pub fn replace(&self, owner_id: i64, foreign_ids: &[i64]) -> Result<()> {
        self.destroy_all(owner_id)?;
        self.insert(owner_id, foreign_ids)
    }

    fn destroy_all(&self, owner_id: i64) -> Result<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.execute(&sql, &[Value::Integer(owner_id)])?;
        Ok(())
    }
}

/// Ordered one-to-many file relation `(owner_id, file_id, is_primary)`
///
/// At most one row per owner carries `is_primary`; retrieval always
/// yields that file first, remaining files in storage-return order.
pub struct FilesRepository<'conn> {
    ex: Executor<'conn>,
    table: &'static str,
    owner_column: &'static str,
}

impl<'conn> FilesRepository<'conn> {
    pub fn new(conn: &'conn Connection, table: &'static str, owner_column: &'static str) -> Self {
        Self {
            ex: Executor::new(conn),
            table,
            owner_column,
        }
    }

    /// File ids for one owner, primary first
    pub fn get(&self, owner_id: i64) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT file_id, is_primary FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );

        let mut ret: Vec<i64> = Vec::new();
        let rows = self.ex.query_vec(&sql, &[Value::Integer(owner_id)], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?))
        })?;
        for (file_id, primary) in rows {
            if primary {
                ret.insert(0, file_id);
            } else {
                ret.push(file_id);
            }
        }

        Ok(ret)
    }

    /// File ids for a batch of owners.
    ///
    /// The result is partitioned per input id; output order matches the
    /// input id order, not the scan order, and each owner's list is
    /// primary-first.
    pub fn get_many(&self, owner_ids: &[i64], primary_only: bool) -> Result<Vec<Vec<i64>>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let primary_clause = if primary_only {
            " AND is_primary = 1"
        } else {
            ""
        };

        let sql = format!(
            "SELECT {} as id, file_id, is_primary FROM {} WHERE {} IN {}{}",
            self.owner_column,
            self.table,
            self.owner_column,
            in_binding(owner_ids.len()),
            primary_clause
        );

        let args: Vec<Value> = owner_ids.iter().map(|&id| Value::Integer(id)).collect();
        let rows = self.ex.query_vec(&sql, &args, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?;

        let mut ret: Vec<Vec<i64>> = vec![Vec::new(); owner_ids.len()];
        let id_to_index: std::collections::HashMap<i64, usize> = owner_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        for (owner_id, file_id, primary) in rows {
            let Some(&index) = id_to_index.get(&owner_id) else {
                continue;
            };
            if primary {
                ret[index].insert(0, file_id);
            } else {
                ret[index].push(file_id);
            }
        }

        Ok(ret)
    }

    /// Replace the file set for one owner
    pub fn replace(&self, owner_id: i64, file_ids: &[(i64, bool)]) -> Result<()> {
        let delete = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.execute(&delete, &[Value::Integer(owner_id)])?;

        let insert = format!(
            "INSERT INTO {} ({}, file_id, is_primary) VALUES (?, ?, ?)",
            self.table, self.owner_column
        );
        for &(file_id, primary) in file_ids {
            self.ex.execute(
                &insert,
                &[
                    Value::Integer(owner_id),
                    Value::Integer(file_id),
                    Value::Integer(primary as i64),
                ],
            )?;
        }

        Ok(())
    }
}

/// Flat string-list relation `(owner_id, value)`
///
/// No dedup beyond what the caller enforces before replace.
pub struct StringRepository<'conn> {
    ex: Executor<'conn>,
    table: &'static str,
    owner_column: &'static str,
    value_column: &'static str,
}

impl<'conn> StringRepository<'conn> {
    pub fn new(
        conn: &'conn Connection,
        table: &'static str,
        owner_column: &'static str,
        value_column: &'static str,
    ) -> Self {
        Self {
            ex: Executor::new(conn),
            table,
            owner_column,
            value_column,
        }
    }

    /// All values for one owner, in storage-return order
    pub fn get(&self, owner_id: i64) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            self.value_column, self.table, self.owner_column
        );
        self.ex
            .query_vec(&sql, &[Value::Integer(owner_id)], |row| row.get(0))
    }

    /// Insert a single value for one owner
    pub fn insert(&self, owner_id: i64, value: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            self.table, self.owner_column, self.value_column
        );
        self.ex.execute(
            &sql,
            &[Value::Integer(owner_id), Value::Text(value.to_string())],
        )?;
        Ok(())
    }

    /// Replace all values for one owner
    pub fn replace(&self, owner_id: i64, values: &[String]) -> Result<()> {
        let delete = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.execute(&delete, &[Value::Integer(owner_id)])?;

        for value in values {
            self.insert(owner_id, value)?;
        }

        Ok(())
    }
}

/// External-id relation `(owner_id, endpoint, external_id)`
pub struct ExternalIdRepository<'conn> {
    ex: Executor<'conn>,
    table: &'static str,
    owner_column: &'static str,
}

impl<'conn> ExternalIdRepository<'conn> {
    pub fn new(conn: &'conn Connection, table: &'static str, owner_column: &'static str) -> Self {
        Self {
            ex: Executor::new(conn),
            table,
            owner_column,
        }
    }

    /// All external ids for one owner
    pub fn get(&self, owner_id: i64) -> Result<Vec<ExternalId>> {
        let sql = format!(
            "SELECT endpoint, external_id FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.query_vec(&sql, &[Value::Integer(owner_id)], |row| {
            Ok(ExternalId {
                endpoint: row.get(0)?,
                external_id: row.get(1)?,
            })
        })
    }

    /// Replace all external ids for one owner
    pub fn replace(&self, owner_id: i64, external_ids: &[ExternalId]) -> Result<()> {
        let delete = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.execute(&delete, &[Value::Integer(owner_id)])?;

        let insert = format!(
            "INSERT INTO {} ({}, endpoint, external_id) VALUES (?, ?, ?)",
            self.table, self.owner_column
        );
        for external in external_ids {
            self.ex.execute(
                &insert,
                &[
                    Value::Integer(owner_id),
                    Value::Text(external.endpoint.clone()),
                    Value::Text(external.external_id.clone()),
                ],
            )?;
        }

        Ok(())
    }
}

/// Caption relation `(owner_id, language_code, filename, caption_type)`
pub struct CaptionRepository<'conn> {
    ex: Executor<'conn>,
    table: &'static str,
    owner_column: &'static str,
}

impl<'conn> CaptionRepository<'conn> {
    pub fn new(conn: &'conn Connection, table: &'static str, owner_column: &'static str) -> Self {
        Self {
            ex: Executor::new(conn),
            table,
            owner_column,
        }
    }

    /// All captions for one owner
    pub fn get(&self, owner_id: i64) -> Result<Vec<Caption>> {
        let sql = format!(
            "SELECT language_code, filename, caption_type FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.query_vec(&sql, &[Value::Integer(owner_id)], |row| {
            Ok(Caption {
                language_code: row.get(0)?,
                filename: row.get(1)?,
                caption_type: row.get(2)?,
            })
        })
    }

    /// Insert a single caption for one owner
    pub fn insert(&self, owner_id: i64, caption: &Caption) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, language_code, filename, caption_type) VALUES (?, ?, ?, ?)",
            self.table, self.owner_column
        );
        self.ex.execute(
            &sql,
            &[
                Value::Integer(owner_id),
                Value::Text(caption.language_code.clone()),
                Value::Text(caption.filename.clone()),
                Value::Text(caption.caption_type.clone()),
            ],
        )?;
        Ok(())
    }

    /// Replace all captions for one owner
    pub fn replace(&self, owner_id: i64, captions: &[Caption]) -> Result<()> {
        let delete = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        self.ex.execute(&delete, &[Value::Integer(owner_id)])?;

        for caption in captions {
            self.insert(owner_id, caption)?;
        }

        Ok(())
    }
}
