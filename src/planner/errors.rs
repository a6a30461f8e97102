//! Planner error types
//!
//! Error codes:
//! - EDM_UNSUPPORTED_RESOURCE (REJECT)
//! - EDM_COMPOSITE_KEY (REJECT)
//! - EDM_UNRESOLVED_PATH (REJECT)
//! - EDM_INVALID_VALUE (REJECT)
//! - EDM_UNSUPPORTED_EXPRESSION (RECOVERABLE)

use std::fmt;

use crate::model::ModelError;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Caller may drop the offending filter and continue
    Recoverable,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Recoverable => write!(f, "RECOVERABLE"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Resource path shape not supported
    EdmUnsupportedResource,
    /// More than one key predicate on a segment
    EdmCompositeKey,
    /// Path names an entity set, type or navigation the model lacks
    EdmUnresolvedPath,
    /// Literal value not acceptable for the comparison
    EdmInvalidValue,
    /// Filter expression shape or operator not supported
    EdmUnsupportedExpression,
}

impl PlannerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::EdmUnsupportedResource => "EDM_UNSUPPORTED_RESOURCE",
            PlannerErrorCode::EdmCompositeKey => "EDM_COMPOSITE_KEY",
            PlannerErrorCode::EdmUnresolvedPath => "EDM_UNRESOLVED_PATH",
            PlannerErrorCode::EdmInvalidValue => "EDM_INVALID_VALUE",
            PlannerErrorCode::EdmUnsupportedExpression => "EDM_UNSUPPORTED_EXPRESSION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            PlannerErrorCode::EdmUnsupportedExpression => Severity::Recoverable,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
    field: Option<String>,
}

impl PlannerError {
    /// Resource path shape not supported
    pub fn unsupported_resource(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::EdmUnsupportedResource,
            message: reason.into(),
            field: None,
        }
    }

    /// Composite keys are not supported
    pub fn composite_key(segment: impl Into<String>) -> Self {
        let segment = segment.into();
        Self {
            code: PlannerErrorCode::EdmCompositeKey,
            message: format!("Composite keys are not supported (segment '{}')", segment),
            field: Some(segment),
        }
    }

    /// Invalid literal for a field
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::EdmInvalidValue,
            message: reason.into(),
            field: Some(field.into()),
        }
    }

    /// Unsupported filter expression
    pub fn unsupported_expression(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::EdmUnsupportedExpression,
            message: reason.into(),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// True when the request may proceed without the failing filter
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field or segment name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl From<ModelError> for PlannerError {
    fn from(err: ModelError) -> Self {
        Self {
            code: PlannerErrorCode::EdmUnresolvedPath,
            message: err.message().to_string(),
            field: err.name().map(str::to_string),
        }
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlannerErrorCode::EdmCompositeKey.code(),
            "EDM_COMPOSITE_KEY"
        );
        assert_eq!(
            PlannerErrorCode::EdmUnsupportedExpression.code(),
            "EDM_UNSUPPORTED_EXPRESSION"
        );
    }

    #[test]
    fn test_only_expression_errors_are_recoverable() {
        assert!(PlannerError::unsupported_expression("contains()").is_recoverable());
        assert!(!PlannerError::invalid_value("id", "Id value can not be null").is_recoverable());
        assert!(!PlannerError::composite_key("Books").is_recoverable());
        assert!(!PlannerError::unsupported_resource("x").is_recoverable());
    }

    #[test]
    fn test_model_error_conversion() {
        let err = PlannerError::from(ModelError::unknown_entity_set("Chapters"));
        assert_eq!(err.code(), PlannerErrorCode::EdmUnresolvedPath);
        assert_eq!(err.field(), Some("Chapters"));
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::composite_key("Books");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("EDM_COMPOSITE_KEY"));
        assert!(display.contains("Books"));
    }
}
