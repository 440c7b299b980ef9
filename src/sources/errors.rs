//! Source errors
//!
//! These never reach an HTTP client. The ingestor logs them and substitutes
//! fallback data.

use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Source {source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("Source {source_name} timed out after {after_ms}ms")]
    Timeout { source_name: String, after_ms: u64 },
}

impl SourceError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Unavailable { source_name, .. } | SourceError::Timeout { source_name, .. } => {
                source_name
            }
        }
    }
}
