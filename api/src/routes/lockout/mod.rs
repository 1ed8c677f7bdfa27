//! Authentication lockout route handlers
//!
//! Support endpoints over a user's `AccountAuthentication` bucket:
//! - Status of the bucket
//! - Recording a failed attempt
//! - Clearing prior attempts

pub mod attempt;
pub mod clear;
pub mod status;

use wd_core::repositories::LockoutStorage;
use wd_core::services::AuthenticationLockout;

/// Shared state of the lockout routes
pub struct AppState<S>
where
    S: LockoutStorage,
{
    pub lockout: AuthenticationLockout<S>,
}

impl<S> AppState<S>
where
    S: LockoutStorage,
{
    pub fn new(lockout: AuthenticationLockout<S>) -> Self {
        Self { lockout }
    }
}
