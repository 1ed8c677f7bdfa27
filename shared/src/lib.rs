//! Shared configuration and response types for the Warden server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (environment, Redis, lockout policy, logging)
//! - Error response structures

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthenticationLockoutConfig, CacheConfig, ConfigError, Environment, LogFormat,
    LockoutType, LoggingConfig, MethodLockoutConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
