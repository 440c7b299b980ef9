//! # Record Errors
//!
//! Validation errors for client payloads and failures of the record store.

use thiserror::Error;
use uuid::Uuid;

/// Result type for record validation
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A client-supplied record failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Body was not a JSON object of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl RecordError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RecordError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Validation failures are always the caller's fault
    pub fn status_code(&self) -> u16 {
        400
    }
}

/// Record store failures
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage error: lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Io(_) | StoreError::Corrupt(_) | StoreError::LockPoisoned => 500,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RecordError::MissingField("crop").status_code(), 400);
        assert_eq!(StoreError::NotFound(Uuid::new_v4()).status_code(), 404);
        assert_eq!(StoreError::Io("disk full".into()).status_code(), 500);
    }

    #[test]
    fn test_missing_field_message() {
        let err = RecordError::MissingField("region");
        assert_eq!(err.to_string(), "Missing required field: region");
    }
}
