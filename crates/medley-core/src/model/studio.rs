use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// Studio - a production source for scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Studio {
    /// Store-assigned numeric identity (0 until first insert)
    pub id: i64,

    /// Studio name
    pub name: String,

    /// Homepage URL, when known
    pub url: Option<String>,

    /// Parent studio for networks, when applicable
    pub parent_id: Option<i64>,

    /// Timestamp when this studio was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this studio was last updated
    pub updated_at: DateTime<Utc>,
}

impl Studio {
    /// Create a new unsaved studio with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            url: None,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for [`Studio`]
#[derive(Debug, Clone, Default)]
pub struct StudioPatch {
    pub name: Patch<String>,
    pub url: Patch<String>,
    pub parent_id: Patch<i64>,
    pub updated_at: Patch<DateTime<Utc>>,
}
