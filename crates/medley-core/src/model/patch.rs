//! Partial-update field markers

/// A field wrapped with an explicit present/absent marker for partial
/// updates.
///
/// `Absent` fields are never written. `Null` explicitly clears a nullable
/// column. `Value` sets the column. This replaces nullable-pointer
/// sentinels with a type the compiler checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was not supplied; the column is left untouched
    Absent,
    /// Field was supplied as an explicit null
    Null,
    /// Field was supplied with a value
    Value(T),
}

// Manual impl: the derive would demand `T: Default`, which DateTime lacks.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// True if the field was not supplied
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// True if the field was supplied, as either a value or an explicit null
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Borrow the inner value, if one was supplied
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Build a patch from an optional value, mapping `None` to `Null`.
    ///
    /// Use for callers that model "supplied but empty" with `Option`;
    /// absence must be stated with [`Patch::Absent`] directly.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_absent() {
        let p: Patch<String> = Patch::default();
        assert!(p.is_absent());
        assert!(!p.is_present());
    }

    #[test]
    fn test_from_option_maps_none_to_null() {
        assert_eq!(Patch::<i64>::from_option(None), Patch::Null);
        assert_eq!(Patch::from_option(Some(3)), Patch::Value(3));
    }

    #[test]
    fn test_as_value() {
        assert_eq!(Patch::Value(7).as_value(), Some(&7));
        assert_eq!(Patch::<i64>::Null.as_value(), None);
    }
}
