//! Repository layer
//!
//! Provides:
//! - Query executor with count+id dual execution and CTE support
//! - Generic per-entity CRUD repository
//! - Relationship-table repositories (joins, files, strings, external
//!   ids, captions)

mod executor;
mod query;
mod relations;
mod repository;

pub use executor::{build_count_query, Executor};
pub use query::FindQuery;
pub use relations::{
    CaptionRepository, ExternalIdRepository, FilesRepository, JoinInsert, JoinRepository,
    StringRepository,
};
pub use repository::Repository;
