//! Error types for the Villaflow automation core

use thiserror::Error;

/// Main application error type
///
/// Maps the pipeline's failure taxonomy: transient storage failures (retried
/// only by the ingestion path), a terminal retry-budget-exhausted variant that
/// carries the attempt count, collaborator failures (notification, financial),
/// and the usual not-found/validation pair. Duplicate detection and missed
/// property matches are *not* errors; they surface through result structs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage write failed after {attempts} attempts: {message}")]
    StorageExhausted { attempts: u32, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Financial reporting error: {0}")]
    Financial(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Attempt count for retry-exhausted storage failures, if applicable.
    pub fn retry_count(&self) -> Option<u32> {
        match self {
            AppError::StorageExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
