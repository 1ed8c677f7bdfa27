//! Lockout bucket specification

use serde::{Deserialize, Serialize};
use std::time::Duration;

use wd_shared::{AuthenticationLockoutConfig, LockoutType};

/// Well-known bucket names
pub mod bucket_names {
    /// Failed authentication attempts of one user
    pub const ACCOUNT_AUTHENTICATION: &str = "AccountAuthentication";
}

/// Separator between key segments
pub const KEY_SEPARATOR: &str = ":";

/// Immutable policy for one class of rate-limited action
///
/// `name` plus `arguments` identify the bucket; two specs with the same name
/// and arguments always share one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    /// Category identifier, e.g. `AccountAuthentication`
    pub name: String,
    /// Subject-specific parts of the key, usually a user id
    pub arguments: Vec<String>,
    /// Attempts allowed within the history window; 0 disables the bucket
    pub max_attempts: u32,
    /// Quiet period after which the attempt counter resets
    pub history_duration: Duration,
    /// Base of the exponential backoff
    pub minimum_duration: Duration,
    /// Cap of the lock duration
    pub maximum_duration: Duration,
    /// Multiplier per violation beyond `max_attempts`
    pub backoff_factor: f64,
    /// Shared by all contributors when true, split per contributor otherwise
    pub is_global: bool,
}

impl BucketSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<String>,
        max_attempts: u32,
        history_duration: Duration,
        minimum_duration: Duration,
        maximum_duration: Duration,
        backoff_factor: f64,
        is_global: bool,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            max_attempts,
            history_duration,
            minimum_duration,
            maximum_duration,
            backoff_factor,
            is_global,
        }
    }

    /// A bucket that never locks
    pub fn disabled(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
            max_attempts: 0,
            history_duration: Duration::ZERO,
            minimum_duration: Duration::ZERO,
            maximum_duration: Duration::ZERO,
            backoff_factor: 1.0,
            is_global: true,
        }
    }

    /// Build a bucket from a lockout policy
    pub fn from_policy(
        name: impl Into<String>,
        arguments: Vec<String>,
        config: &AuthenticationLockoutConfig,
    ) -> Self {
        if !config.is_enabled() {
            return Self::disabled(name, arguments);
        }

        Self {
            name: name.into(),
            arguments,
            max_attempts: config.max_attempts,
            history_duration: config.history_duration(),
            minimum_duration: config.minimum_duration(),
            maximum_duration: config.maximum_duration(),
            backoff_factor: config.backoff_factor,
            is_global: config.lockout_type == LockoutType::PerUser,
        }
    }

    /// Authentication lockout for a single user
    pub fn account_authentication(config: &AuthenticationLockoutConfig, user_id: &str) -> Self {
        Self::from_policy(
            bucket_names::ACCOUNT_AUTHENTICATION,
            vec![user_id.to_string()],
            config,
        )
    }

    /// Whether the bucket can lock at all
    pub fn enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// `name:arg1:arg2...`
    pub fn key(&self) -> String {
        let mut key = self.name.clone();
        for arg in &self.arguments {
            key.push_str(KEY_SEPARATOR);
            key.push_str(arg);
        }
        key
    }

    /// Full store key: `app:<app_id>:lockout:<key>[:<contributor>]`
    ///
    /// The contributor is appended only for non-global buckets.
    pub fn storage_key(&self, app_id: &str, contributor: &str) -> String {
        let mut key = format!("app:{}:lockout:{}", app_id, self.key());
        if !self.is_global && !contributor.is_empty() {
            key.push_str(KEY_SEPARATOR);
            key.push_str(contributor);
        }
        key
    }

    /// Numeric parameters of the attempt algorithm, in milliseconds
    pub fn attempt_params(&self) -> super::AttemptParams {
        super::AttemptParams {
            history_ms: duration_ms(self.history_duration),
            max_attempts: i64::from(self.max_attempts),
            min_duration_ms: duration_ms(self.minimum_duration),
            max_duration_ms: duration_ms(self.maximum_duration),
            backoff_factor: self.backoff_factor,
        }
    }
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
