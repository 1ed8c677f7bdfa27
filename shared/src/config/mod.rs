//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Redis connection and key namespace
//! - `environment` - Environment detection and logging configuration
//! - `lockout` - Authentication lockout policy

pub mod cache;
pub mod environment;
pub mod lockout;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use lockout::{AuthenticationLockoutConfig, LockoutType, MethodLockoutConfig};

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "WARDEN";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Authentication lockout policy
    #[serde(default)]
    pub lockout: AuthenticationLockoutConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            cache: CacheConfig::default(),
            lockout: AuthenticationLockoutConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cache: CacheConfig::default(),
            lockout: AuthenticationLockoutConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            cache: CacheConfig::new("redis://redis:6379"),
            lockout: AuthenticationLockoutConfig::production(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Build configuration from the environment preset plus plain env variables
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };
        config.cache = CacheConfig::from_env();
        config.lockout = config.lockout.with_env_overrides();
        config
    }

    /// Load layered configuration: environment file, then `WARDEN__*` variables
    ///
    /// `WARDEN__LOCKOUT__MAX_ATTEMPTS=5` overrides `lockout.max_attempts`.
    pub fn load() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(env.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.environment = env;
        config.validate()?;
        Ok(config)
    }

    /// Validate every sub-configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.app_id.is_empty() {
            return Err(ConfigError::invalid("cache.app_id", "must not be empty"));
        }
        if self.cache.response_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "cache.response_timeout_ms",
                "must be greater than 0",
            ));
        }
        self.lockout.validate()
    }
}
