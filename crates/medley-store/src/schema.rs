//! Schema descriptors
//!
//! Every entity type declares a static [`TableSpec`] mapping its fields to
//! storage columns. The generic repository derives its column lists from
//! the descriptor at call time; no runtime type inspection is involved.

use rusqlite::types::Value;
use rusqlite::Row;

/// One stored column of an entity table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Storage column name
    pub name: &'static str,
    /// Whether the column accepts an explicit NULL in a partial update
    pub nullable: bool,
}

/// Static schema descriptor for one entity table
///
/// `columns` is ordered and excludes the identity column; it drives both
/// the INSERT field list and full-UPDATE SET clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name
    pub table: &'static str,
    /// Identity column name (store-assigned on insert)
    pub id_column: &'static str,
    /// Ordered non-identity columns
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    /// The SELECT projection for full-row fetches: identity column first,
    /// then the descriptor columns in order. [`Entity::from_row`] scans
    /// positionally against this ordering.
    pub fn select_list(&self) -> String {
        let mut list = String::from(self.id_column);
        for col in self.columns {
            list.push_str(", ");
            list.push_str(col.name);
        }
        list
    }

    /// Look up a descriptor column by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A storable entity with a static schema descriptor
///
/// `bind` must yield exactly one value per descriptor column, in
/// descriptor order; the repository treats any mismatch as an internal
/// error.
pub trait Entity: Sized {
    /// Partial-update companion type
    type Patch: EntityPatch;

    /// The entity's schema descriptor
    fn spec() -> &'static TableSpec;

    /// Scan a full row fetched with [`TableSpec::select_list`]
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Bind values for the descriptor columns, identity excluded
    fn bind(&self) -> Vec<Value>;
}

/// A partial update against one entity table
///
/// `bind` yields (column, value) pairs for present fields only; absent
/// fields never appear.
pub trait EntityPatch {
    /// The schema descriptor of the table this patch applies to
    fn spec() -> &'static TableSpec;

    /// Bind (column, value) pairs for the present fields
    fn bind(&self) -> Vec<(&'static str, Value)>;
}
