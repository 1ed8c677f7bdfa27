pub mod error;

pub use error::{handle_domain_error, retry_after_seconds, status_for, ApiError};
