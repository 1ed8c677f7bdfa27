//! Business services containing lockout use cases.

pub mod lockout;

// Re-export commonly used types
pub use lockout::{AuthenticationLockout, LockoutMethod, LockoutService};
