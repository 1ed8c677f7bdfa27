pub mod error;
pub mod lockout;

pub use error::{ErrorResponse, ErrorResponseExt};
pub use lockout::{AttemptResponse, IpQuery, LockoutStatusResponse, RecordAttemptRequest};
