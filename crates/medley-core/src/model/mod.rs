//! Domain models
//!
//! Entities carry a store-assigned numeric id and plain data fields.
//! Relationship membership (tags on a scene, files behind a scene, …) is
//! not modeled here; it lives in join tables managed by the store layer.

mod patch;
mod performer;
mod relations;
mod scene;
mod studio;
mod tag;

pub use patch::Patch;
pub use performer::{Performer, PerformerPatch};
pub use relations::{Caption, ExternalId};
pub use scene::{Scene, ScenePatch};
pub use studio::{Studio, StudioPatch};
pub use tag::{Tag, TagPatch};
