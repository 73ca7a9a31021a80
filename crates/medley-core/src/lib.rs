//! Medley core - domain models and shared facilities
//!
//! Provides:
//! - Domain models (scenes, tags, studios, performers) and value objects
//! - `Patch<T>` present/absent markers for partial updates
//! - Structured error facility with a stable kind taxonomy
//! - Tracing initialization

pub mod errors;
pub mod logging;
pub mod model;

// Re-export key types
pub use errors::{MedleyError, MedleyErrorKind, Result};
