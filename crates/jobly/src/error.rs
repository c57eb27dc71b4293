//! Error types for jobly

use crate::changeset::ValidationErrors;
use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Errors raised by the SQL compilers, the model façade and the ambient layers.
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update was requested without any field to change.
    #[error("No data")]
    NoData,

    /// No record matched the requested id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement execution failed in the database collaborator.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Input rejected at the validation boundary.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Malformed SQL produced by a builder (identifier or placeholder mismatch).
    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    /// Migration error
    #[cfg(feature = "migrate")]
    #[error("Migration error: {0}")]
    Migration(String),
}

impl JoblyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_sql(message: impl Into<String>) -> Self {
        Self::InvalidSql(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an empty partial update
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Whether the database collaborator rejected or failed the statement.
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            Self::Query(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{constraint}: {message}")),
                "23503" => return Self::ForeignKeyViolation(format!("{constraint}: {message}")),
                "23514" => return Self::CheckViolation(format!("{constraint}: {message}")),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<ValidationErrors> for JoblyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "migrate")]
impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::{ValidationCode, ValidationError};

    #[test]
    fn no_data_is_not_an_execution_failure() {
        let err = JoblyError::NoData;
        assert!(err.is_no_data());
        assert!(!err.is_not_found());
        assert!(!err.is_execution_failure());
        assert_eq!(err.to_string(), "No data");
    }

    #[test]
    fn not_found_carries_message() {
        let err = JoblyError::not_found("No job: 7");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: No job: 7");
    }

    #[test]
    fn constraint_violations_are_execution_failures() {
        assert!(JoblyError::CheckViolation("jobs_equity_check".into()).is_execution_failure());
        assert!(JoblyError::ForeignKeyViolation("fk".into()).is_execution_failure());
    }

    #[test]
    fn validation_errors_convert() {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::new(
            "title",
            ValidationCode::Required,
            "title is required",
        ));
        let err: JoblyError = errors.into();
        assert!(matches!(err, JoblyError::Validation(ref e) if e.len() == 1));
        assert_eq!(err.to_string(), "Validation failed: title: title is required");
    }
}
