//! Studio finder

#![allow(clippy::result_large_err)]

use medley_core::model::{Studio, StudioPatch};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::errors::Result;
use crate::repo::Repository;
use crate::schema::Entity;

/// Studio operations bound to one connection/transaction
pub struct StudioStore<'conn> {
    repo: Repository<'conn, Studio>,
}

impl<'conn> StudioStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            repo: Repository::new(conn),
        }
    }

    pub fn create(&self, studio: &Studio) -> Result<Studio> {
        self.repo.insert(studio)
    }

    pub fn find(&self, id: i64) -> Result<Studio> {
        self.repo.get_by_id(id)
    }

    pub fn update_partial(&self, id: i64, patch: &StudioPatch) -> Result<()> {
        self.repo.update_partial(id, patch)
    }

    pub fn destroy_existing(&self, ids: &[i64]) -> Result<()> {
        self.repo.destroy_existing(ids)
    }

    /// Look up a studio by exact name.
    ///
    /// # Errors
    ///
    /// - `NotFound` — no studio with this name exists
    pub fn find_by_name(&self, name: &str) -> Result<Studio> {
        let spec = Studio::spec();
        let sql = format!(
            "SELECT {} FROM {} WHERE name = ? LIMIT 1",
            spec.select_list(),
            spec.table
        );

        self.repo
            .executor()
            .query_one(&sql, &[Value::Text(name.to_string())], Studio::from_row)
    }
}
