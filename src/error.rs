//! Error types for Libris

use std::path::PathBuf;

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for expected business-rule failures (duplicate key, unknown key,
    /// invalid state transition), as opposed to persistence faults.
    pub fn is_business_failure(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::Conflict(_) | AppError::BusinessRule(_)
        )
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
