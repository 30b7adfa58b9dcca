//! Error types for row collection and record hydration
//!
//! Coercion itself never fails; these errors come from the cursor, from the
//! shape of the destination record, or from an empty result.

use thiserror::Error;

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Boxed error coming from the underlying cursor
pub type CursorError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid destination: {0}")]
    Argument(String),

    #[error("Rows is empty")]
    EmptyResult,

    #[error("Cursor error: {0}")]
    Io(#[source] CursorError),

    #[error("Type mismatch on field '{field}': {expected} cannot be read from a {found} column")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

impl FetchError {
    /// Create a new argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Wrap a cursor failure
    pub fn io<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io(Box::new(err))
    }

    /// Create a type mismatch error; the field name is filled in by the
    /// field setter that caught it
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: String::new(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach a field name to a type mismatch error
    pub fn for_field(self, name: &str) -> Self {
        match self {
            Self::TypeMismatch {
                expected, found, ..
            } => Self::TypeMismatch {
                field: name.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Error type for coercion configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_field_fills_type_mismatch() {
        let err = FetchError::type_mismatch("bool", "i64").for_field("active");
        match err {
            FetchError::TypeMismatch { field, expected, found } => {
                assert_eq!(field, "active");
                assert_eq!(expected, "bool");
                assert_eq!(found, "i64");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_for_field_leaves_other_errors() {
        let err = FetchError::EmptyResult.for_field("id");
        assert!(err.is_empty_result());
    }

    #[test]
    fn test_io_keeps_source() {
        let err = FetchError::io(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));
        assert!(err.is_io());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Cursor error: broken pipe");
    }
}
