//! Custom error types and handling
//!
//! This module defines the tool's error type. Every maintenance procedure
//! returns [`AppResult`]; the binary logs the error and exits non-zero.

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Column {table}.{column} was left as {left_as}: {reason}")]
    SchemaRestore {
        table: String,
        column: String,
        left_as: String,
        reason: String,
    },

    // Self-check errors
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    // Local I/O and serialization
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::SchemaRestore { .. } => "SCHEMA_RESTORE_FAILED",
            Self::VerificationFailed(_) => "VERIFICATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) | Self::Configuration(_) => 2,
            Self::VerificationFailed(_) => 3,
            Self::SchemaRestore { .. } => 4,
            _ => 1,
        }
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
            sqlx::Error::Configuration(e) => AppError::Configuration(e.to_string()),
            sqlx::Error::Database(db_err) => AppError::Database(db_err.to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation("x".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::from(sqlx::Error::RowNotFound).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::from(ConfigError::InvalidValue("DB_PORT".into())).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_schema_restore_message_names_column() {
        let err = AppError::SchemaRestore {
            table: "students".into(),
            column: "skills".into(),
            left_as: "TEXT".into(),
            reason: "Invalid JSON text".into(),
        };
        assert_eq!(
            err.to_string(),
            "Column students.skills was left as TEXT: Invalid JSON text"
        );
        assert_eq!(err.exit_code(), 4);
    }
}
