//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, StorageError};

use thiserror::Error;
use wd_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    /// True when the error is the lockout refusal rather than a fault
    pub fn is_lockout(&self) -> bool {
        matches!(self, DomainError::Auth(AuthError::AccountLockout { .. }))
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Auth(err) => err.to_error_response(),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::Storage(_) => ErrorResponse::new(
                error_codes::STORAGE_UNAVAILABLE,
                "Service temporarily unavailable",
            ),
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
