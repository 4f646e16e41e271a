//! Error types and handling for analysis operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum MomijiError {
    /// Configuration building or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule execution faults surfaced during traversal
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Rule,
    Io,
    Internal,
}

impl MomijiError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MomijiError::ConfigError { .. } => ErrorKind::Config,
            MomijiError::RuleError { .. } => ErrorKind::Rule,
            MomijiError::IoError { .. } => ErrorKind::Io,
            MomijiError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Rule)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MomijiError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
