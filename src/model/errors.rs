//! Data-model error types
//!
//! Error codes:
//! - EDM_UNKNOWN_ENTITY_SET (REJECT)
//! - EDM_UNKNOWN_ENTITY_TYPE (REJECT)
//! - EDM_UNKNOWN_PROPERTY (REJECT)
//! - EDM_UNKNOWN_NAVIGATION (REJECT)
//! - EDM_MALFORMED_MODEL (FATAL)

use std::fmt;

/// Severity levels for model errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Model cannot be used; the process must not start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Model-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorCode {
    /// Entity set name not declared
    EdmUnknownEntitySet,
    /// Entity type name not declared
    EdmUnknownEntityType,
    /// Property not declared on the entity type
    EdmUnknownProperty,
    /// Navigation property not declared or not bound
    EdmUnknownNavigation,
    /// Model file unreadable or structurally invalid
    EdmMalformedModel,
}

impl ModelErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ModelErrorCode::EdmUnknownEntitySet => "EDM_UNKNOWN_ENTITY_SET",
            ModelErrorCode::EdmUnknownEntityType => "EDM_UNKNOWN_ENTITY_TYPE",
            ModelErrorCode::EdmUnknownProperty => "EDM_UNKNOWN_PROPERTY",
            ModelErrorCode::EdmUnknownNavigation => "EDM_UNKNOWN_NAVIGATION",
            ModelErrorCode::EdmMalformedModel => "EDM_MALFORMED_MODEL",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ModelErrorCode::EdmMalformedModel => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for ModelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Model error with context
#[derive(Debug, Clone)]
pub struct ModelError {
    code: ModelErrorCode,
    message: String,
    name: Option<String>,
}

impl ModelError {
    /// Entity set not found
    pub fn unknown_entity_set(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ModelErrorCode::EdmUnknownEntitySet,
            message: format!("Entity set '{}' not found", name),
            name: Some(name),
        }
    }

    /// Entity type not found
    pub fn unknown_entity_type(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ModelErrorCode::EdmUnknownEntityType,
            message: format!("Entity type '{}' not found", name),
            name: Some(name),
        }
    }

    /// Property not declared on the given type
    pub fn unknown_property(entity_type: &str, property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            code: ModelErrorCode::EdmUnknownProperty,
            message: format!(
                "Property '{}' is not declared on '{}'",
                property, entity_type
            ),
            name: Some(property),
        }
    }

    /// Navigation not declared or has no target set
    pub fn unknown_navigation(entity_set: &str, navigation: impl Into<String>) -> Self {
        let navigation = navigation.into();
        Self {
            code: ModelErrorCode::EdmUnknownNavigation,
            message: format!(
                "Navigation '{}' from '{}' has no target entity set",
                navigation, entity_set
            ),
            name: Some(navigation),
        }
    }

    /// Model source is unreadable or invalid
    pub fn malformed_model(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ModelErrorCode::EdmMalformedModel,
            message: format!("{}: {}", source.into(), reason.into()),
            name: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ModelErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for ModelError {
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

impl std::error::Error for ModelError {}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ModelErrorCode::EdmUnknownEntitySet.code(),
            "EDM_UNKNOWN_ENTITY_SET"
        );
        assert_eq!(
            ModelErrorCode::EdmMalformedModel.code(),
            "EDM_MALFORMED_MODEL"
        );
    }

    #[test]
    fn test_malformed_is_fatal() {
        let err = ModelError::malformed_model("model.json", "bad json");
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(err.name().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = ModelError::unknown_property("Book", "isbn");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("EDM_UNKNOWN_PROPERTY"));
        assert!(display.contains("isbn"));
        assert_eq!(err.name(), Some("isbn"));
    }
}
