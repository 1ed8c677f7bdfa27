//! Domain error to HTTP response mapping

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use chrono::{DateTime, Utc};
use tracing::{error, warn};

use wd_core::errors::{AuthError, DomainError};
use wd_shared::IntoErrorResponse;

use crate::dto::ErrorResponseExt;

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Auth(AuthError::AccountLockout { .. }) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Whole seconds until `until`, rounded up, never below one
pub fn retry_after_seconds(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (until - now).num_milliseconds();
    ((remaining_ms + 999) / 1000).max(1)
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Lockouts become 429 with the unlock time in `details.until` and a
/// `Retry-After` header.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    let body = error.to_error_response();

    match error {
        DomainError::Auth(AuthError::AccountLockout { until }) => {
            warn!(locked_until = %until, "Request refused by account lockout");
            HttpResponse::build(status)
                .insert_header((
                    header::RETRY_AFTER,
                    retry_after_seconds(*until, Utc::now()).to_string(),
                ))
                .json(body)
        }
        DomainError::Storage(e) => {
            error!(error = %e, "Lockout store unavailable");
            body.to_response(status)
        }
        DomainError::Internal { message } => {
            error!(error = %message, "Internal error");
            body.to_response(status)
        }
        _ => body.to_response(status),
    }
}

/// `DomainError` usable as an actix-web handler error
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(&self.0)
    }
}
