//! Lockout storage trait defining the atomic attempt contract.

use async_trait::async_trait;

use crate::domain::lockout::{AttemptRecord, AttemptUpdate, BucketSpec};
use crate::errors::StorageError;

/// Persistent store for lockout buckets
///
/// Every implementation must run `update` as one indivisible
/// read-decide-write per effective key, using a clock shared by all callers.
/// Errors are reserved for store faults; a locked bucket is reported through
/// `AttemptUpdate::is_success`, never as an error.
#[async_trait]
pub trait LockoutStorage: Send + Sync {
    /// Apply `delta` attempts to the bucket
    ///
    /// # Arguments
    /// * `spec` - Bucket policy
    /// * `contributor` - Originating actor, e.g. the source IP
    /// * `delta` - Attempts to add; `0` only reads the current state
    ///
    /// # Returns
    /// * `Ok(AttemptUpdate)` with the pre-update success flag and current lock
    /// * `Err(StorageError)` on connection, timeout or record faults
    async fn update(
        &self,
        spec: &BucketSpec,
        contributor: &str,
        delta: u32,
    ) -> Result<AttemptUpdate, StorageError>;

    /// Delete the bucket record, including any active lock
    async fn clear(&self, spec: &BucketSpec, contributor: &str) -> Result<(), StorageError>;

    /// Read the current record without touching it or its expiry
    async fn inspect(
        &self,
        spec: &BucketSpec,
        contributor: &str,
    ) -> Result<Option<AttemptRecord>, StorageError>;
}
