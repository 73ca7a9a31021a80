//! Per-entity schema descriptors and bindings
//!
//! Each entity declares its [`TableSpec`] once and implements the
//! [`Entity`]/[`EntityPatch`] traits against it. Bind order and
//! `from_row` positions follow the descriptor column order; identity is
//! always scanned first.

use chrono::{DateTime, Utc};
use medley_core::model::{
    Patch, Performer, PerformerPatch, Scene, ScenePatch, Studio, StudioPatch, Tag, TagPatch,
};
use rusqlite::types::Value;
use rusqlite::Row;

use crate::schema::{ColumnSpec, Entity, EntityPatch, TableSpec};

fn timestamp(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(index)?;
    Ok(DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now))
}

fn patch_value<T: Clone + Into<Value>>(patch: &Patch<T>) -> Option<Value> {
    match patch {
        Patch::Absent => None,
        Patch::Null => Some(Value::Null),
        Patch::Value(v) => Some(v.clone().into()),
    }
}

fn patch_timestamp(patch: &Patch<DateTime<Utc>>) -> Option<Value> {
    match patch {
        Patch::Absent => None,
        Patch::Null => Some(Value::Null),
        Patch::Value(v) => Some(Value::Integer(v.timestamp())),
    }
}

fn push_present(pairs: &mut Vec<(&'static str, Value)>, column: &'static str, value: Option<Value>) {
    if let Some(value) = value {
        pairs.push((column, value));
    }
}

// ===== Scene =====

pub const SCENE_TABLE: TableSpec = TableSpec {
    table: "scenes",
    id_column: "id",
    columns: &[
        ColumnSpec {
            name: "title",
            nullable: false,
        },
        ColumnSpec {
            name: "details",
            nullable: true,
        },
        ColumnSpec {
            name: "date",
            nullable: true,
        },
        ColumnSpec {
            name: "rating",
            nullable: true,
        },
        ColumnSpec {
            name: "studio_id",
            nullable: true,
        },
        ColumnSpec {
            name: "organized",
            nullable: false,
        },
        ColumnSpec {
            name: "created_at",
            nullable: false,
        },
        ColumnSpec {
            name: "updated_at",
            nullable: false,
        },
    ],
};

impl Entity for Scene {
    type Patch = ScenePatch;

    fn spec() -> &'static TableSpec {
        &SCENE_TABLE
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Scene {
            id: row.get(0)?,
            title: row.get(1)?,
            details: row.get(2)?,
            date: row.get(3)?,
            rating: row.get(4)?,
            studio_id: row.get(5)?,
            organized: row.get(6)?,
            created_at: timestamp(row, 7)?,
            updated_at: timestamp(row, 8)?,
        })
    }

    fn bind(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.details.clone().into(),
            self.date.clone().into(),
            self.rating.into(),
            self.studio_id.into(),
            self.organized.into(),
            Value::Integer(self.created_at.timestamp()),
            Value::Integer(self.updated_at.timestamp()),
        ]
    }
}

impl EntityPatch for ScenePatch {
    fn spec() -> &'static TableSpec {
        &SCENE_TABLE
    }

    fn bind(&self) -> Vec<(&'static str, Value)> {
        let mut pairs = Vec::new();
        push_present(&mut pairs, "title", patch_value(&self.title));
        push_present(&mut pairs, "details", patch_value(&self.details));
        push_present(&mut pairs, "date", patch_value(&self.date));
        push_present(&mut pairs, "rating", patch_value(&self.rating));
        push_present(&mut pairs, "studio_id", patch_value(&self.studio_id));
        push_present(&mut pairs, "organized", patch_value(&self.organized));
        push_present(&mut pairs, "updated_at", patch_timestamp(&self.updated_at));
        pairs
    }
}

// ===== Tag =====

pub const TAG_TABLE: TableSpec = TableSpec {
    table: "tags",
    id_column: "id",
    columns: &[
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "description",
            nullable: true,
        },
        ColumnSpec {
            name: "created_at",
            nullable: false,
        },
        ColumnSpec {
            name: "updated_at",
            nullable: false,
        },
    ],
};

impl Entity for Tag {
    type Patch = TagPatch;

    fn spec() -> &'static TableSpec {
        &TAG_TABLE
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: timestamp(row, 3)?,
            updated_at: timestamp(row, 4)?,
        })
    }

    fn bind(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.description.clone().into(),
            Value::Integer(self.created_at.timestamp()),
            Value::Integer(self.updated_at.timestamp()),
        ]
    }
}

impl EntityPatch for TagPatch {
    fn spec() -> &'static TableSpec {
        &TAG_TABLE
    }

    fn bind(&self) -> Vec<(&'static str, Value)> {
        let mut pairs = Vec::new();
        push_present(&mut pairs, "name", patch_value(&self.name));
        push_present(&mut pairs, "description", patch_value(&self.description));
        push_present(&mut pairs, "updated_at", patch_timestamp(&self.updated_at));
        pairs
    }
}

// ===== Studio =====

pub const STUDIO_TABLE: TableSpec = TableSpec {
    table: "studios",
    id_column: "id",
    columns: &[
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "url",
            nullable: true,
        },
        ColumnSpec {
            name: "parent_id",
            nullable: true,
        },
        ColumnSpec {
            name: "created_at",
            nullable: false,
        },
        ColumnSpec {
            name: "updated_at",
            nullable: false,
        },
    ],
};

impl Entity for Studio {
    type Patch = StudioPatch;

    fn spec() -> &'static TableSpec {
        &STUDIO_TABLE
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Studio {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            parent_id: row.get(3)?,
            created_at: timestamp(row, 4)?,
            updated_at: timestamp(row, 5)?,
        })
    }

    fn bind(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.url.clone().into(),
            self.parent_id.into(),
            Value::Integer(self.created_at.timestamp()),
            Value::Integer(self.updated_at.timestamp()),
        ]
    }
}

impl EntityPatch for StudioPatch {
    fn spec() -> &'static TableSpec {
        &STUDIO_TABLE
    }

    fn bind(&self) -> Vec<(&'static str, Value)> {
        let mut pairs = Vec::new();
        push_present(&mut pairs, "name", patch_value(&self.name));
        push_present(&mut pairs, "url", patch_value(&self.url));
        push_present(&mut pairs, "parent_id", patch_value(&self.parent_id));
        push_present(&mut pairs, "updated_at", patch_timestamp(&self.updated_at));
        pairs
    }
}

// ===== Performer =====

pub const PERFORMER_TABLE: TableSpec = TableSpec {
    table: "performers",
    id_column: "id",
    columns: &[
        ColumnSpec {
            name: "name",
            nullable: false,
        },
        ColumnSpec {
            name: "disambiguation",
            nullable: true,
        },
        ColumnSpec {
            name: "created_at",
            nullable: false,
        },
        ColumnSpec {
            name: "updated_at",
            nullable: false,
        },
    ],
};

impl Entity for Performer {
    type Patch = PerformerPatch;

    fn spec() -> &'static TableSpec {
        &PERFORMER_TABLE
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Performer {
            id: row.get(0)?,
            name: row.get(1)?,
            disambiguation: row.get(2)?,
            created_at: timestamp(row, 3)?,
            updated_at: timestamp(row, 4)?,
        })
    }

    fn bind(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.disambiguation.clone().into(),
            Value::Integer(self.created_at.timestamp()),
            Value::Integer(self.updated_at.timestamp()),
        ]
    }
}

impl EntityPatch for PerformerPatch {
    fn spec() -> &'static TableSpec {
        &PERFORMER_TABLE
    }

    fn bind(&self) -> Vec<(&'static str, Value)> {
        let mut pairs = Vec::new();
        push_present(&mut pairs, "name", patch_value(&self.name));
        push_present(
            &mut pairs,
            "disambiguation",
            patch_value(&self.disambiguation),
        );
        push_present(&mut pairs, "updated_at", patch_timestamp(&self.updated_at));
        pairs
    }
}
