use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// Tag - a label attached to scenes, arranged in a hierarchy
///
/// Parent/child edges live in the `tags_relations` join table; a tag may
/// have descendants at any depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Store-assigned numeric identity (0 until first insert)
    pub id: i64,

    /// Unique tag name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Timestamp when this tag was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this tag was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new unsaved tag with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for [`Tag`]
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub updated_at: Patch<DateTime<Utc>>,
}
