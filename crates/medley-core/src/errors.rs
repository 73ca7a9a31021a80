//! Error facility for the Medley storage layer
//!
//! Provides a structured error type with a stable kind taxonomy and
//! builder-style context. Higher layers branch on [`MedleyErrorKind`];
//! the context fields exist for diagnosability, not control flow.

use thiserror::Error;

/// Result type alias using MedleyError
pub type Result<T> = std::result::Result<T, MedleyError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling
/// and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MedleyErrorKind {
    /// A single-row fetch by identity returned zero rows
    #[error("not found")]
    NotFound,
    /// An update/destroy precondition failed: the target id does not exist.
    /// Raised before the mutating statement is attempted, which keeps it
    /// distinct from a zero-row affected count.
    #[error("does not exist")]
    NotExist,
    /// A uniqueness or foreign-key violation surfaced from the store
    #[error("constraint violation")]
    ConstraintViolation,
    /// Caller-supplied input failed validation before reaching the store
    #[error("invalid input")]
    InvalidInput,
    /// Filesystem-level failure
    #[error("io error")]
    Io,
    /// Any other driver/syntax failure from the store
    #[error("persistence error")]
    Persistence,
    /// An internal invariant was broken
    #[error("internal error")]
    Internal,
}

impl MedleyErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            MedleyErrorKind::NotFound => "ERR_NOT_FOUND",
            MedleyErrorKind::NotExist => "ERR_NOT_EXIST",
            MedleyErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            MedleyErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            MedleyErrorKind::Io => "ERR_IO",
            MedleyErrorKind::Persistence => "ERR_PERSISTENCE",
            MedleyErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind plus optional context: the operation, the table and
/// entity id involved, and for store failures the offending statement
/// text with its rendered arguments.
#[derive(Debug, Clone)]
pub struct MedleyError {
    kind: MedleyErrorKind,
    op: Option<String>,
    table: Option<String>,
    entity_id: Option<i64>,
    statement: Option<String>,
    args: Option<String>,
    message: String,
    source: Option<Box<MedleyError>>,
}

impl MedleyError {
    /// Create a new error with the specified kind
    pub fn new(kind: MedleyErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            entity_id: None,
            statement: None,
            args: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add entity id context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add the offending statement text and its rendered arguments
    pub fn with_statement(mut self, statement: impl Into<String>, args: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self.args = Some(args.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: MedleyError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> MedleyErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the entity id context, if any
    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Get the offending statement text, if any
    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    /// Get the rendered statement arguments, if any
    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&MedleyError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for MedleyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.kind)?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(entity_id) = self.entity_id {
            write!(f, " (id: {})", entity_id)?;
        }
        if let Some(statement) = &self.statement {
            write!(f, " (statement: {})", statement)?;
        }
        if let Some(args) = &self.args {
            write!(f, " (args: {})", args)?;
        }
        Ok(())
    }
}

impl std::error::Error for MedleyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|s| s.as_ref() as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_stable() {
        assert_eq!(MedleyErrorKind::NotFound.code(), "ERR_NOT_FOUND");
        assert_eq!(MedleyErrorKind::NotExist.code(), "ERR_NOT_EXIST");
        assert_eq!(
            MedleyErrorKind::ConstraintViolation.code(),
            "ERR_CONSTRAINT_VIOLATION"
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = MedleyError::new(MedleyErrorKind::NotExist)
            .with_op("update")
            .with_table("scenes")
            .with_entity_id(42)
            .with_message("id 42 does not exist in scenes");

        let rendered = err.to_string();
        assert!(rendered.contains("ERR_NOT_EXIST"));
        assert!(rendered.contains("update"));
        assert!(rendered.contains("scenes"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn test_statement_context_round_trips() {
        let err = MedleyError::new(MedleyErrorKind::Persistence)
            .with_statement("SELECT 1", "[Integer(1)]");
        assert_eq!(err.statement(), Some("SELECT 1"));
        assert_eq!(err.args(), Some("[Integer(1)]"));
    }
}
