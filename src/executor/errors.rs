//! Executor error types
//!
//! Error codes:
//! - EDM_SEARCH_FAILED (FATAL)
//! - EDM_MALFORMED_RESPONSE (FATAL)
//! - EDM_DOCUMENT_LOAD (ERROR)
//!
//! Nothing here is retried; a failed search fails the request.

use std::fmt;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed but the process is healthy
    Error,
    /// Request cannot complete
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Search call failed to communicate or execute
    EdmSearchFailed,
    /// Engine answered with a body that is not a search response
    EdmMalformedResponse,
    /// Seed documents could not be read
    EdmDocumentLoad,
}

impl ExecutorErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::EdmSearchFailed => "EDM_SEARCH_FAILED",
            ExecutorErrorCode::EdmMalformedResponse => "EDM_MALFORMED_RESPONSE",
            ExecutorErrorCode::EdmDocumentLoad => "EDM_DOCUMENT_LOAD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::EdmDocumentLoad => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    /// Index the search targeted, if known
    index: Option<String>,
}

impl ExecutorError {
    /// Search communication or execution failure
    pub fn search_failed(index: impl Into<String>, reason: impl Into<String>) -> Self {
        let index = index.into();
        Self {
            code: ExecutorErrorCode::EdmSearchFailed,
            message: format!("Search on '{}' failed: {}", index, reason.into()),
            index: Some(index),
        }
    }

    /// Unparseable search response
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::EdmMalformedResponse,
            message: reason.into(),
            index: None,
        }
    }

    /// Document seed file problem
    pub fn document_load(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::EdmDocumentLoad,
            message: format!("Cannot load documents from {}: {}", source.into(), reason.into()),
            index: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
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

    /// Returns the index if applicable
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ExecutorError {
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

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_failure_is_fatal() {
        let err = ExecutorError::search_failed("library", "connection refused");
        assert!(err.is_fatal());
        assert_eq!(err.index(), Some("library"));
        assert_eq!(err.code().code(), "EDM_SEARCH_FAILED");
    }

    #[test]
    fn test_display_format() {
        let err = ExecutorError::malformed_response("missing hits");
        assert_eq!(
            format!("{}", err),
            "[FATAL] EDM_MALFORMED_RESPONSE: missing hits"
        );
    }

    #[test]
    fn test_document_load_not_fatal() {
        let err = ExecutorError::document_load("docs.json", "bad json");
        assert!(!err.is_fatal());
        assert!(err.message().contains("docs.json"));
    }
}
