//! Lockout service implementation

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::lockout::{AttemptRecord, BucketSpec, MakeAttemptResult};
use crate::errors::{AuthError, DomainResult, StorageError};
use crate::repositories::LockoutStorage;

/// Service applying lockout buckets through an injected storage
pub struct LockoutService<S>
where
    S: LockoutStorage,
{
    storage: Arc<S>,
}

impl<S> Clone for LockoutService<S>
where
    S: LockoutStorage,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<S> LockoutService<S>
where
    S: LockoutStorage,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Record `attempts` attempts against the bucket
    ///
    /// # Arguments
    /// * `spec` - Bucket policy; a disabled spec never touches storage
    /// * `contributor` - Originating actor, e.g. the source IP
    /// * `attempts` - Attempts to add; `0` is a pure status check
    ///
    /// # Returns
    /// * `Ok(MakeAttemptResult)` - Attempt allowed; `locked_until` may already
    ///   be set when this attempt reached the threshold
    /// * `Err(DomainError::Auth(AuthError::AccountLockout))` - Bucket was locked
    /// * `Err(DomainError::Storage)` - Store failure, propagated unchanged
    pub async fn make_attempt(
        &self,
        spec: &BucketSpec,
        contributor: &str,
        attempts: u32,
    ) -> DomainResult<MakeAttemptResult> {
        if !spec.enabled() {
            debug!(bucket = %spec.key(), "Lockout bucket disabled, skipping");
            return Ok(MakeAttemptResult::default());
        }

        let update = self.storage.update(spec, contributor, attempts).await?;

        if !update.is_success {
            let until = update.locked_until.ok_or_else(|| StorageError::Internal {
                message: format!("bucket '{}' refused without a lock expiry", spec.key()),
            })?;

            warn!(
                bucket = %spec.key(),
                contributor = contributor,
                locked_until = %until,
                "Attempt rejected, bucket is locked"
            );
            return Err(AuthError::AccountLockout { until }.into());
        }

        match update.locked_until {
            Some(until) if attempts > 0 => info!(
                bucket = %spec.key(),
                contributor = contributor,
                attempts = attempts,
                locked_until = %until,
                "Attempt recorded, bucket locked"
            ),
            _ => debug!(
                bucket = %spec.key(),
                contributor = contributor,
                attempts = attempts,
                "Attempt recorded"
            ),
        }

        Ok(MakeAttemptResult {
            locked_until: update.locked_until,
        })
    }

    /// Fail with the lockout error if the bucket is currently locked
    pub async fn check(&self, spec: &BucketSpec, contributor: &str) -> DomainResult<()> {
        self.make_attempt(spec, contributor, 0).await.map(|_| ())
    }

    /// Forget all attempts, lifting any active lock
    pub async fn clear_attempts(&self, spec: &BucketSpec, contributor: &str) -> DomainResult<()> {
        self.storage.clear(spec, contributor).await?;

        info!(
            bucket = %spec.key(),
            contributor = contributor,
            "Lockout attempts cleared"
        );
        Ok(())
    }

    /// Current stored record, if any
    pub async fn get_record(
        &self,
        spec: &BucketSpec,
        contributor: &str,
    ) -> DomainResult<Option<AttemptRecord>> {
        Ok(self.storage.inspect(spec, contributor).await?)
    }
}
