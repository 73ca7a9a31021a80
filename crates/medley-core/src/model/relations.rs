use serde::{Deserialize, Serialize};

/// Cross-reference into an external metadata system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalId {
    /// Endpoint URL of the external system
    pub endpoint: String,
    /// Identifier of this entity within that system
    pub external_id: String,
}

/// Subtitle track attached to a media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// ISO language code, e.g. "en"
    pub language_code: String,
    /// Caption filename relative to the media file
    pub filename: String,
    /// Caption format, e.g. "srt" or "vtt"
    pub caption_type: String,
}
