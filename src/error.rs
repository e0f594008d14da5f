//! Errors raised by the session lifecycle.

use thiserror::Error;

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Enter valid number: at least {min_length} characters required, got {actual}")]
    Validation { min_length: usize, actual: usize },

    #[error("No active session. Log in before activating premium.")]
    NoSession,

    #[error("Premium window of {premium_days} days is out of range")]
    ExpiryOutOfRange { premium_days: i64 },

    #[error("Stored session is malformed: {0}")]
    Malformed(String),

    #[error("Stored session version {0} is not supported")]
    UnsupportedVersion(u32),

    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialization(#[from] serde_json::Error),
}
