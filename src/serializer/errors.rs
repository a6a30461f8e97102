//! Serializer error types
//!
//! Error codes:
//! - EDM_MISSING_CONTEXT (ERROR)
//! - EDM_INCONSISTENT_PROPERTY_TYPE (ERROR)
//! - EDM_WRONG_PROPERTY_VALUE (ERROR)
//!
//! All of them are server-side failures.

use std::fmt;

/// Serializer-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerErrorCode {
    /// Scalar response without a context URL while metadata is requested
    EdmMissingContext,
    /// Value shape does not match the property kind
    EdmInconsistentPropertyType,
    /// Value does not fit the primitive type
    EdmWrongPropertyValue,
}

impl SerializerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SerializerErrorCode::EdmMissingContext => "EDM_MISSING_CONTEXT",
            SerializerErrorCode::EdmInconsistentPropertyType => "EDM_INCONSISTENT_PROPERTY_TYPE",
            SerializerErrorCode::EdmWrongPropertyValue => "EDM_WRONG_PROPERTY_VALUE",
        }
    }
}

impl fmt::Display for SerializerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Serializer error type with full context
#[derive(Debug, Clone)]
pub struct SerializerError {
    code: SerializerErrorCode,
    message: String,
    property: Option<String>,
}

impl SerializerError {
    pub fn missing_context() -> Self {
        Self {
            code: SerializerErrorCode::EdmMissingContext,
            message: "ContextURL null!".to_string(),
            property: None,
        }
    }

    pub fn inconsistent_property_type(
        property: impl Into<String>,
        expected: &str,
        actual: &str,
    ) -> Self {
        let property = property.into();
        Self {
            code: SerializerErrorCode::EdmInconsistentPropertyType,
            message: format!(
                "Property '{}' is declared {} but the value is {}",
                property, expected, actual
            ),
            property: Some(property),
        }
    }

    pub fn wrong_property_value(property: impl Into<String>, reason: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            code: SerializerErrorCode::EdmWrongPropertyValue,
            message: format!("Wrong value for property '{}': {}", property, reason.into()),
            property: Some(property),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SerializerErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending property if applicable
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }
}

impl fmt::Display for SerializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SerializerError {}

/// Result type for serializer operations
pub type SerializerResult<T> = Result<T, SerializerError>;
