//! Error types shared across the crate.

use thiserror::Error;

/// Top-level error for configuration, persistence and delivery failures.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("mail error: {0}")]
    MailError(String),

    #[error("job error: {0}")]
    JobError(String),
}

/// Result alias used by the library.
pub type WardenResult<T> = Result<T, WardenError>;

impl From<crate::mail::MailError> for WardenError {
    fn from(err: crate::mail::MailError) -> Self {
        WardenError::MailError(err.to_string())
    }
}

impl From<crate::jobs::JobError> for WardenError {
    fn from(err: crate::jobs::JobError) -> Self {
        WardenError::JobError(err.to_string())
    }
}
