//! Domain-specific error types for authentication and lockout storage

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use wd_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// Authentication-related errors surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Too many failed attempts; further attempts are refused until `until`
    #[error("Account locked until {until}")]
    AccountLockout { until: DateTime<Utc> },

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Unlock time for lockout errors
    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        match self {
            AuthError::AccountLockout { until } => Some(*until),
            _ => None,
        }
    }
}

impl IntoErrorResponse for AuthError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            AuthError::AccountLockout { until } => ErrorResponse::new(
                error_codes::ACCOUNT_LOCKOUT,
                "Too many failed attempts. Please try again later",
            )
            .add_detail("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            AuthError::InvalidCredentials => {
                ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid credentials")
            }
        }
    }
}

/// Lockout store failures
///
/// These are infrastructure faults. None of them means "locked" or "allowed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Lockout store connection error: {message}")]
    Connection { message: String },

    #[error("Lockout store did not respond within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Malformed lockout record at '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("Lockout script failed: {message}")]
    Script { message: String },

    #[error("Lockout store internal error: {message}")]
    Internal { message: String },
}
