//! Error handling for medley-store
//!
//! Wraps medley-core MedleyError with store-specific constructors

#![allow(clippy::result_large_err)]

use medley_core::errors::{MedleyError, MedleyErrorKind};
use rusqlite::types::Value;

/// Result type alias using MedleyError
pub type Result<T> = std::result::Result<T, MedleyError>;

/// Create a database error from rusqlite::Error
///
/// Uniqueness and foreign-key failures map to `ConstraintViolation` so
/// callers can branch on them; everything else is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> MedleyError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            MedleyErrorKind::ConstraintViolation
        }
        _ => MedleyErrorKind::Persistence,
    };

    MedleyError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a database error carrying the offending statement and arguments
pub fn statement_error(statement: &str, args: &[Value], err: rusqlite::Error) -> MedleyError {
    from_rusqlite(err).with_statement(statement, render_args(args))
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> MedleyError {
    MedleyError::new(MedleyErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> MedleyError {
    MedleyError::new(MedleyErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> MedleyError {
    MedleyError::new(MedleyErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Render bind arguments for diagnostics
fn render_args(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", rendered.join(", "))
}
