//! Lockout service module
//!
//! This module turns bucket state into caller-facing results:
//! - Counting failed attempts against a bucket
//! - Refusing attempts while a bucket is locked
//! - Forgiving prior failures after a successful authentication
//! - Authentication-specific policy (per-method switches, per-IP buckets)

mod authentication;
mod service;

#[cfg(test)]
mod tests;

pub use authentication::{AuthenticationLockout, LockoutMethod};
pub use service::LockoutService;
