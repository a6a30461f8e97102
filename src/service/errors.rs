//! # Service Errors
//!
//! Top-level failure taxonomy with the protocol status each kind maps to.

use serde::Serialize;
use thiserror::Error;

use crate::executor::ExecutorError;
use crate::planner::{PlannerError, PlannerErrorCode};
use crate::serializer::SerializerError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of one compile-and-execute call
#[derive(Debug, Error)]
pub enum ServiceError {
    // ==================
    // Client Errors (4xx/501)
    // ==================
    /// Path or filter could not be compiled
    #[error("{0}")]
    Planner(#[from] PlannerError),

    /// Scalar request matched no entity
    #[error("No entity found for property '{0}'")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Search call failed
    #[error("{0}")]
    Executor(#[from] ExecutorError),

    /// Result could not be written
    #[error("{0}")]
    Serializer(#[from] SerializerError),
}

impl ServiceError {
    /// Protocol status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Planner(err) => match err.code() {
                // 501 Not Implemented
                PlannerErrorCode::EdmUnsupportedResource
                | PlannerErrorCode::EdmCompositeKey
                | PlannerErrorCode::EdmUnsupportedExpression => 501,
                // 400 Bad Request
                PlannerErrorCode::EdmInvalidValue => 400,
                // 404 Not Found
                PlannerErrorCode::EdmUnresolvedPath => 404,
            },
            ServiceError::NotFound(_) => 404,
            ServiceError::Executor(_) | ServiceError::Serializer(_) => 500,
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Planner(err) => err.code().code(),
            ServiceError::NotFound(_) => "EDM_NOT_FOUND",
            ServiceError::Executor(err) => err.code().code(),
            ServiceError::Serializer(err) => err.code().code(),
        }
    }

    /// Human-readable message without the code prefix
    pub fn message(&self) -> String {
        match self {
            ServiceError::Planner(err) => err.message().to_string(),
            ServiceError::Executor(err) => err.message().to_string(),
            ServiceError::Serializer(err) => err.message().to_string(),
            ServiceError::NotFound(_) => self.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self {
            code: err.status_code(),
            error: err.message(),
        }
    }
}
