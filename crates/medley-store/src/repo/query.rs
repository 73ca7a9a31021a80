//! Find-query filter state
//!
//! An accumulating builder for dynamic search queries: WHERE fragments,
//! HAVING fragments, bind arguments, optional WITH(-RECURSIVE) common
//! table expressions, and a sort/pagination suffix. One instance is built
//! per search call and discarded after execution.

use rusqlite::types::Value;

/// Accumulated filter state for one find query.
///
/// `body` is the projection and joins, e.g.
/// `SELECT scenes.id FROM scenes LEFT JOIN scenes_tags ON ...`. Fragments
/// combine with AND; callers needing OR embed it inside a single fragment.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    body: String,
    where_clauses: Vec<String>,
    having_clauses: Vec<String>,
    with_clauses: Vec<String>,
    recursive_with: bool,
    args: Vec<Value>,
    sort_and_pagination: String,
}

impl FindQuery {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Append a WHERE fragment
    pub fn add_where(&mut self, clause: impl Into<String>) {
        self.where_clauses.push(clause.into());
    }

    /// Append a HAVING fragment.
    ///
    /// Any HAVING fragment triggers an automatic `GROUP BY <owner>.id`
    /// when the query is rendered.
    pub fn add_having(&mut self, clause: impl Into<String>) {
        self.having_clauses.push(clause.into());
    }

    /// Append a common table expression, e.g.
    /// `tag_tree(child_id) AS (SELECT ...)`
    pub fn add_with(&mut self, clause: impl Into<String>) {
        self.with_clauses.push(clause.into());
    }

    /// Mark the WITH clause recursive
    pub fn set_recursive(&mut self, recursive: bool) {
        self.recursive_with = recursive;
    }

    /// Append one bind argument
    pub fn add_arg(&mut self, arg: impl Into<Value>) {
        self.args.push(arg.into());
    }

    /// Append several bind arguments
    pub fn add_args(&mut self, args: impl IntoIterator<Item = Value>) {
        self.args.extend(args);
    }

    /// Set the ORDER BY clause, replacing any previous sort
    pub fn sort_by(&mut self, order_by: impl Into<String>) {
        self.sort_and_pagination = format!(" ORDER BY {}", order_by.into());
    }

    /// Append a LIMIT/OFFSET window for the given 1-based page.
    ///
    /// Rendered as integer literals; the bind list stays identical
    /// between the count and ids statements.
    pub fn paginate(&mut self, page: u64, per_page: u64) {
        let per_page = per_page.max(1);
        let offset = page.saturating_sub(1) * per_page;
        self.sort_and_pagination
            .push_str(&format!(" LIMIT {} OFFSET {}", per_page, offset));
    }

    /// Bind arguments in append order
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The sort/pagination suffix, possibly empty
    pub fn sort_and_pagination(&self) -> &str {
        &self.sort_and_pagination
    }

    /// Render `body [WHERE ...] [GROUP BY owner.id HAVING ...]`.
    ///
    /// Grouping applies only when at least one HAVING fragment is
    /// present; WHERE-only queries do not group.
    pub fn build_body(&self, owner_table: &str) -> String {
        let mut body = self.body.clone();
        if !self.where_clauses.is_empty() {
            body.push_str(" WHERE ");
            body.push_str(&self.where_clauses.join(" AND "));
        }
        if !self.having_clauses.is_empty() {
            body.push_str(&format!(" GROUP BY {}.id", owner_table));
            body.push_str(" HAVING ");
            body.push_str(&self.having_clauses.join(" AND "));
        }
        body
    }

    /// Render the `WITH [RECURSIVE] cte1, cte2 ` prefix, or an empty
    /// string when no CTEs were added
    pub fn build_with_clause(&self) -> String {
        if self.with_clauses.is_empty() {
            return String::new();
        }
        let recursive = if self.recursive_with { "RECURSIVE " } else { "" };
        format!("WITH {}{} ", recursive, self.with_clauses.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_body_renders_unchanged() {
        let q = FindQuery::new("SELECT scenes.id FROM scenes");
        assert_eq!(q.build_body("scenes"), "SELECT scenes.id FROM scenes");
        assert_eq!(q.build_with_clause(), "");
    }

    #[test]
    fn test_where_clauses_join_with_and() {
        let mut q = FindQuery::new("SELECT scenes.id FROM scenes");
        q.add_where("scenes.organized = ?");
        q.add_where("scenes.rating >= ?");
        assert_eq!(
            q.build_body("scenes"),
            "SELECT scenes.id FROM scenes WHERE scenes.organized = ? AND scenes.rating >= ?"
        );
    }

    #[test]
    fn test_having_implies_group_by() {
        let mut q = FindQuery::new(
            "SELECT scenes.id FROM scenes LEFT JOIN scenes_tags ON scenes_tags.scene_id = scenes.id",
        );
        q.add_having("COUNT(scenes_tags.tag_id) = ?");
        let body = q.build_body("scenes");
        assert!(body.contains("GROUP BY scenes.id"));
        assert!(body.contains("HAVING COUNT(scenes_tags.tag_id) = ?"));
    }

    #[test]
    fn test_where_only_does_not_group() {
        let mut q = FindQuery::new("SELECT scenes.id FROM scenes");
        q.add_where("scenes.title LIKE ?");
        assert!(!q.build_body("scenes").contains("GROUP BY"));
    }

    #[test]
    fn test_recursive_with_clause() {
        let mut q = FindQuery::new("SELECT tags.id FROM tags");
        q.add_with("t(n) AS (SELECT 1)");
        q.set_recursive(true);
        assert_eq!(q.build_with_clause(), "WITH RECURSIVE t(n) AS (SELECT 1) ");
    }

    #[test]
    fn test_paginate_appends_after_sort() {
        let mut q = FindQuery::new("SELECT scenes.id FROM scenes");
        q.sort_by("scenes.id ASC");
        q.paginate(2, 10);
        assert_eq!(
            q.sort_and_pagination(),
            " ORDER BY scenes.id ASC LIMIT 10 OFFSET 10"
        );
    }
}
