//! Tag finder
//!
//! Tag CRUD plus hierarchy traversal. Parent/child edges live in
//! `tags_relations`; descendant resolution uses a recursive CTE so it
//! reaches depth > 1 in one query.

#![allow(clippy::result_large_err)]

use medley_core::model::{Tag, TagPatch};
use rusqlite::Connection;

use crate::errors::Result;
use crate::repo::{FindQuery, JoinRepository, Repository};

/// Tag operations bound to one connection/transaction
pub struct TagStore<'conn> {
    conn: &'conn Connection,
    repo: Repository<'conn, Tag>,
}

impl<'conn> TagStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            repo: Repository::new(conn),
        }
    }

    fn children_joins(&self) -> JoinRepository<'conn> {
        JoinRepository::new(self.conn, "tags_relations", "parent_id", "child_id")
    }

    pub fn create(&self, tag: &Tag) -> Result<Tag> {
        self.repo.insert(tag)
    }

    pub fn find(&self, id: i64) -> Result<Tag> {
        self.repo.get_by_id(id)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        self.repo.exists(id)
    }

    pub fn update_partial(&self, id: i64, patch: &TagPatch) -> Result<()> {
        self.repo.update_partial(id, patch)
    }

    pub fn destroy_existing(&self, ids: &[i64]) -> Result<()> {
        self.repo.destroy_existing(ids)
    }

    /// Attach children to a parent tag
    pub fn add_children(&self, parent_id: i64, child_ids: &[i64]) -> Result<()> {
        self.children_joins().insert(parent_id, child_ids)
    }

    /// Direct children of one tag
    pub fn children(&self, parent_id: i64) -> Result<Vec<i64>> {
        self.children_joins().get_ids(parent_id)
    }

    /// All transitive descendants of one tag, any depth, returning
    /// `(ids, total_count)`
    pub fn descendants(&self, tag_id: i64) -> Result<(Vec<i64>, i64)> {
        let mut query = FindQuery::new(
            "SELECT tags.id FROM tags INNER JOIN tag_tree ON tag_tree.child_id = tags.id",
        );
        query.add_with(
            "tag_tree(child_id) AS (\
             SELECT child_id FROM tags_relations WHERE parent_id = ? \
             UNION \
             SELECT tr.child_id FROM tags_relations tr \
             INNER JOIN tag_tree tt ON tr.parent_id = tt.child_id)",
        );
        query.set_recursive(true);
        query.add_arg(tag_id);
        query.sort_by("tags.id ASC");

        self.repo.query(&query)
    }
}
