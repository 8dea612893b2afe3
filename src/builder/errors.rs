//! Build error types
//!
//! Two tiers, matching the propagation policy:
//! - recoverable: absorbed at the field boundary, the same field is
//!   re-prompted (`InvalidInput`, `UnknownEnumValue`,
//!   `MissingRequiredField`)
//! - fatal: abort the whole record construction (schema shape errors and
//!   prompt channel failures); no partial object is ever handed
//!   downstream

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while constructing a record from raw input.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Token does not parse as the field's primitive kind.
    #[error("Invalid input for field '{field}': {detail}")]
    InvalidInput { field: String, detail: String },

    /// Token is not one of the enum's declared symbols.
    #[error("Unknown value for field '{field}'; valid symbols: {}", symbols.join(", "))]
    UnknownEnumValue { field: String, symbols: Vec<String> },

    /// Empty token on a field with no default and no null branch.
    #[error("Field '{field}' is required and has no default")]
    MissingRequiredField { field: String },

    /// Structural schema error; aborts the whole build.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Prompt channel failure; aborts the whole build.
    #[error("Input channel error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn invalid_input(field: impl Into<String>, detail: impl Into<String>) -> Self {
        BuildError::InvalidInput {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub fn unknown_enum_value(field: impl Into<String>, symbols: &[String]) -> Self {
        BuildError::UnknownEnumValue {
            field: field.into(),
            symbols: symbols.to_vec(),
        }
    }

    pub fn missing_required(field: impl Into<String>) -> Self {
        BuildError::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Recoverable errors re-prompt the same field; fatal errors abort
    /// the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BuildError::InvalidInput { .. }
                | BuildError::UnknownEnumValue { .. }
                | BuildError::MissingRequiredField { .. }
        )
    }

    /// Stable error code string, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::InvalidInput { .. } => "CAST_INVALID_INPUT",
            BuildError::UnknownEnumValue { .. } => "CAST_UNKNOWN_ENUM_VALUE",
            BuildError::MissingRequiredField { .. } => "CAST_MISSING_REQUIRED_FIELD",
            BuildError::Schema(e) => e.code(),
            BuildError::Io(_) => "CAST_INPUT_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(BuildError::invalid_input("age", "not a number").is_recoverable());
        assert!(BuildError::missing_required("orderId").is_recoverable());
        assert!(
            BuildError::unknown_enum_value("status", &["PENDING".into()]).is_recoverable()
        );
        assert!(!BuildError::from(SchemaError::malformed("x")).is_recoverable());
        assert!(!BuildError::from(std::io::Error::other("closed")).is_recoverable());
    }

    #[test]
    fn test_enum_error_names_valid_set() {
        let err = BuildError::unknown_enum_value(
            "status",
            &["PENDING".to_string(), "SHIPPED".to_string()],
        );
        let text = err.to_string();
        assert!(text.contains("PENDING"));
        assert!(text.contains("SHIPPED"));
    }
}
