//! Account authentication lockout
//!
//! Applies the configured authentication lockout policy to one user. The
//! bucket is keyed by user id; with `per_user_per_ip` each source IP gets its
//! own bucket, with `per_user` all IPs share one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use wd_shared::AuthenticationLockoutConfig;

use crate::domain::lockout::{BucketSpec, MakeAttemptResult};
use crate::errors::DomainResult;
use crate::repositories::LockoutStorage;

use super::LockoutService;

/// Authenticator that can count towards the lockout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockoutMethod {
    Password,
    Totp,
    OobOtp,
    RecoveryCode,
}

impl LockoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockoutMethod::Password => "password",
            LockoutMethod::Totp => "totp",
            LockoutMethod::OobOtp => "oob_otp",
            LockoutMethod::RecoveryCode => "recovery_code",
        }
    }
}

impl fmt::Display for LockoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AuthenticationLockout<S>
where
    S: LockoutStorage,
{
    config: AuthenticationLockoutConfig,
    service: LockoutService<S>,
}

impl<S> AuthenticationLockout<S>
where
    S: LockoutStorage,
{
    pub fn new(config: AuthenticationLockoutConfig, service: LockoutService<S>) -> Self {
        Self { config, service }
    }

    pub fn from_storage(config: AuthenticationLockoutConfig, storage: Arc<S>) -> Self {
        Self::new(config, LockoutService::new(storage))
    }

    pub fn config(&self) -> &AuthenticationLockoutConfig {
        &self.config
    }

    pub fn service(&self) -> &LockoutService<S> {
        &self.service
    }

    /// `AccountAuthentication` bucket for `user_id`
    pub fn spec_for_user(&self, user_id: &str) -> BucketSpec {
        BucketSpec::account_authentication(&self.config, user_id)
    }

    /// Whether failures of `method` are counted
    pub fn is_method_enabled(&self, method: LockoutMethod) -> bool {
        let switch = match method {
            LockoutMethod::Password => &self.config.password,
            LockoutMethod::Totp => &self.config.totp,
            LockoutMethod::OobOtp => &self.config.oob_otp,
            LockoutMethod::RecoveryCode => &self.config.recovery_code,
        };
        switch.enabled
    }

    /// Refuse early if the user is currently locked out
    pub async fn check(&self, user_id: &str, ip: &str) -> DomainResult<()> {
        self.service.check(&self.spec_for_user(user_id), ip).await
    }

    /// Count one failed attempt with `method`
    pub async fn make_attempt(
        &self,
        user_id: &str,
        ip: &str,
        method: LockoutMethod,
    ) -> DomainResult<MakeAttemptResult> {
        if !self.is_method_enabled(method) {
            debug!(method = %method, "Method does not count towards lockout");
            return Ok(MakeAttemptResult::default());
        }

        self.service
            .make_attempt(&self.spec_for_user(user_id), ip, 1)
            .await
    }

    /// Forgive prior failures after a successful authentication
    ///
    /// Nothing is cleared unless one of `used_methods` participates in the
    /// lockout.
    pub async fn clear_attempts(
        &self,
        user_id: &str,
        ip: &str,
        used_methods: &[LockoutMethod],
    ) -> DomainResult<()> {
        if !used_methods.iter().any(|m| self.is_method_enabled(*m)) {
            return Ok(());
        }

        self.service
            .clear_attempts(&self.spec_for_user(user_id), ip)
            .await
    }
}
