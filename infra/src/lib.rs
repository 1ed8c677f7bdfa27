//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Warden lockout
//! service. It provides the Redis connection bootstrap and the Redis-backed
//! implementation of the core `LockoutStorage` trait.
//!
//! ## Architecture
//!
//! - **Cache**: Redis client with connection retry and health check
//! - **Lockout**: attempt counting evaluated atomically by a server-side script

// Re-export core types for convenience
pub use wd_core::errors::*;

/// Cache module - Redis client and connection management
pub mod cache;

/// Lockout module - Redis lockout storage
pub mod lockout;

pub use cache::RedisClient;
pub use lockout::RedisLockoutStorage;

use wd_core::errors::StorageError;
use wd_shared::AppConfig;

/// Load application configuration from environment
///
/// Reads a `.env` file if present, then the process environment.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    tracing::info!(
        environment = %config.environment,
        app_id = %config.cache.app_id,
        lockout_enabled = config.lockout.is_enabled(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for StorageError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) => StorageError::Connection {
                message: e.to_string(),
            },
            InfrastructureError::Config(message) => StorageError::Internal { message },
        }
    }
}
