//! Authentication lockout configuration module
//!
//! Describes how failed authentication attempts are counted and how long an
//! account stays locked once the threshold is crossed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConfigError;

/// How lockout buckets are scoped for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockoutType {
    /// One bucket per user, shared by every source IP
    #[default]
    PerUser,
    /// One bucket per user and source IP
    PerUserPerIp,
}

/// Per-method switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MethodLockoutConfig {
    /// Whether failures of this method count towards the lockout
    #[serde(default)]
    pub enabled: bool,
}

impl MethodLockoutConfig {
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Authentication lockout policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthenticationLockoutConfig {
    /// Attempts allowed within the history window; 0 disables lockout
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window after which the attempt counter resets, in seconds
    #[serde(default = "default_history_duration")]
    pub history_duration_seconds: u64,

    /// Base lock duration, in seconds
    #[serde(default = "default_minimum_duration")]
    pub minimum_duration_seconds: u64,

    /// Upper bound of the lock duration, in seconds
    #[serde(default = "default_maximum_duration")]
    pub maximum_duration_seconds: u64,

    /// Growth rate of the lock duration per violation
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Bucket scoping
    #[serde(default)]
    pub lockout_type: LockoutType,

    #[serde(default = "default_method_enabled")]
    pub password: MethodLockoutConfig,

    #[serde(default = "default_method_enabled")]
    pub totp: MethodLockoutConfig,

    #[serde(default = "default_method_enabled")]
    pub oob_otp: MethodLockoutConfig,

    #[serde(default = "default_method_enabled")]
    pub recovery_code: MethodLockoutConfig,
}

impl Default for AuthenticationLockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            history_duration_seconds: default_history_duration(),
            minimum_duration_seconds: default_minimum_duration(),
            maximum_duration_seconds: default_maximum_duration(),
            backoff_factor: default_backoff_factor(),
            lockout_type: LockoutType::default(),
            password: default_method_enabled(),
            totp: default_method_enabled(),
            oob_otp: default_method_enabled(),
            recovery_code: default_method_enabled(),
        }
    }
}

impl AuthenticationLockoutConfig {
    /// Lockout switched off entirely
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Default::default()
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            max_attempts: 20,
            minimum_duration_seconds: 10,
            maximum_duration_seconds: 300,
            ..Default::default()
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self::default()
    }

    /// Apply `LOCKOUT_*` environment variables on top of this policy
    pub fn with_env_overrides(mut self) -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }

        if let Some(v) = var("LOCKOUT_MAX_ATTEMPTS") {
            self.max_attempts = v;
        }
        if let Some(v) = var("LOCKOUT_HISTORY_DURATION_SECONDS") {
            self.history_duration_seconds = v;
        }
        if let Some(v) = var("LOCKOUT_MINIMUM_DURATION_SECONDS") {
            self.minimum_duration_seconds = v;
        }
        if let Some(v) = var("LOCKOUT_MAXIMUM_DURATION_SECONDS") {
            self.maximum_duration_seconds = v;
        }
        if let Some(v) = var("LOCKOUT_BACKOFF_FACTOR") {
            self.backoff_factor = v;
        }
        if let Ok(v) = std::env::var("LOCKOUT_TYPE") {
            match v.as_str() {
                "per_user" => self.lockout_type = LockoutType::PerUser,
                "per_user_per_ip" => self.lockout_type = LockoutType::PerUserPerIp,
                _ => {}
            }
        }
        self
    }

    /// Whether lockout is active at all
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    pub fn history_duration(&self) -> Duration {
        Duration::from_secs(self.history_duration_seconds)
    }

    pub fn minimum_duration(&self) -> Duration {
        Duration::from_secs(self.minimum_duration_seconds)
    }

    pub fn maximum_duration(&self) -> Duration {
        Duration::from_secs(self.maximum_duration_seconds)
    }

    /// Check the policy for inconsistent values
    ///
    /// A disabled policy is always valid; no other field is meaningful then.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_enabled() {
            return Ok(());
        }

        if self.history_duration_seconds == 0 {
            return Err(ConfigError::invalid(
                "lockout.history_duration_seconds",
                "must be greater than 0",
            ));
        }
        if self.minimum_duration_seconds == 0 {
            return Err(ConfigError::invalid(
                "lockout.minimum_duration_seconds",
                "must be greater than 0",
            ));
        }
        if self.minimum_duration_seconds > self.maximum_duration_seconds {
            return Err(ConfigError::invalid(
                "lockout.minimum_duration_seconds",
                format!(
                    "must not exceed maximum_duration_seconds ({} > {})",
                    self.minimum_duration_seconds, self.maximum_duration_seconds
                ),
            ));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ConfigError::invalid(
                "lockout.backoff_factor",
                "must be a finite number >= 1",
            ));
        }

        Ok(())
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_history_duration() -> u64 {
    3600 // 1 hour
}

fn default_minimum_duration() -> u64 {
    60 // 1 minute
}

fn default_maximum_duration() -> u64 {
    3600 // 1 hour
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_method_enabled() -> MethodLockoutConfig {
    MethodLockoutConfig::enabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AuthenticationLockoutConfig::default();
        assert!(config.is_enabled());
        assert!(config.validate().is_ok());
        assert_eq!(config.lockout_type, LockoutType::PerUser);
    }

    #[test]
    fn test_min_duration_above_max_is_rejected() {
        let config = AuthenticationLockoutConfig {
            minimum_duration_seconds: 600,
            maximum_duration_seconds: 60,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lockout.minimum_duration_seconds"));
    }

    #[test]
    fn test_backoff_factor_below_one_is_rejected() {
        let config = AuthenticationLockoutConfig {
            backoff_factor: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AuthenticationLockoutConfig {
            backoff_factor: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_policy_skips_validation() {
        let config = AuthenticationLockoutConfig {
            max_attempts: 0,
            minimum_duration_seconds: 600,
            maximum_duration_seconds: 1,
            ..Default::default()
        };
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: AuthenticationLockoutConfig = toml::from_str(
            r#"
            max_attempts = 3
            lockout_type = "per_user_per_ip"

            [totp]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lockout_type, LockoutType::PerUserPerIp);
        assert!(!config.totp.enabled);
        assert!(config.password.enabled);
        assert_eq!(config.backoff_factor, 2.0);
    }

    #[test]
    fn test_section_without_max_attempts_stays_enabled() {
        let config: AuthenticationLockoutConfig =
            toml::from_str("history_duration_seconds = 600").unwrap();

        assert_eq!(config.max_attempts, AuthenticationLockoutConfig::default().max_attempts);
        assert!(config.is_enabled());
        assert_eq!(config.history_duration_seconds, 600);
    }

    #[test]
    fn test_explicit_zero_disables() {
        let config: AuthenticationLockoutConfig = toml::from_str("max_attempts = 0").unwrap();
        assert!(!config.is_enabled());
    }
}
