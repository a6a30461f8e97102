//! Configuration error types
//!
//! Error codes:
//! - EDM_CONFIG_READ (FATAL)
//! - EDM_CONFIG_PARSE (FATAL)
//! - EDM_CONFIG_INVALID (FATAL)
//!
//! A bad configuration stops startup; there is nothing to fall back to.

use std::fmt;

/// Configuration-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// File could not be read
    EdmConfigRead,
    /// File is not valid configuration JSON
    EdmConfigParse,
    /// Values parsed but violate a constraint
    EdmConfigInvalid,
}

impl ConfigErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::EdmConfigRead => "EDM_CONFIG_READ",
            ConfigErrorCode::EdmConfigParse => "EDM_CONFIG_PARSE",
            ConfigErrorCode::EdmConfigInvalid => "EDM_CONFIG_INVALID",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    pub fn read(path: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: ConfigErrorCode::EdmConfigRead,
            message: format!("Cannot read config '{}': {}", path, reason),
        }
    }

    pub fn parse(path: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: ConfigErrorCode::EdmConfigParse,
            message: format!("Cannot parse config '{}': {}", path, reason),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::EdmConfigInvalid,
            message: reason.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;
