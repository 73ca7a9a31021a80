use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// Performer - a person appearing in scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    /// Store-assigned numeric identity (0 until first insert)
    pub id: i64,

    /// Performer name
    pub name: String,

    /// Disambiguator for performers sharing a name
    pub disambiguation: Option<String>,

    /// Timestamp when this performer was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this performer was last updated
    pub updated_at: DateTime<Utc>,
}

impl Performer {
    /// Create a new unsaved performer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            disambiguation: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for [`Performer`]
#[derive(Debug, Clone, Default)]
pub struct PerformerPatch {
    pub name: Patch<String>,
    pub disambiguation: Patch<String>,
    pub updated_at: Patch<DateTime<Utc>>,
}
