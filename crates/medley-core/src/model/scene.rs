use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// Scene - a library entry backed by one or more media files
///
/// Scenes are the central entity of the library. Relationships (tags,
/// performers, URLs, external ids, files) live in join tables and are
/// managed through the relationship repositories, not on this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Store-assigned numeric identity (0 until first insert)
    pub id: i64,

    /// Display title
    pub title: String,

    /// Optional long-form description
    pub details: Option<String>,

    /// Release date as YYYY-MM-DD, when known
    pub date: Option<String>,

    /// Rating on a 0-100 scale
    pub rating: Option<i64>,

    /// Owning studio, when known
    pub studio_id: Option<i64>,

    /// Whether the scene has been curated into its final form
    pub organized: bool,

    /// Timestamp when this scene was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this scene was last updated
    pub updated_at: DateTime<Utc>,
}

impl Scene {
    /// Create a new unsaved scene with the given title
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            details: None,
            date: None,
            rating: None,
            studio_id: None,
            organized: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for [`Scene`]
///
/// Absent fields are never written; `Null` clears nullable columns.
#[derive(Debug, Clone, Default)]
pub struct ScenePatch {
    pub title: Patch<String>,
    pub details: Patch<String>,
    pub date: Patch<String>,
    pub rating: Patch<i64>,
    pub studio_id: Patch<i64>,
    pub organized: Patch<bool>,
    pub updated_at: Patch<DateTime<Utc>>,
}
