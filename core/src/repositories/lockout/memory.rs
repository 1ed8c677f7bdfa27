//! In-process lockout storage.
//!
//! Each call evaluates the attempt algorithm while holding one mutex, which
//! gives the same per-key atomicity a Redis script has. Time comes from the
//! injected [`Clock`] so tests can move it explicitly. Expired records are
//! swept on every write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::lockout::{
    epoch_ms_to_datetime, evaluate_attempt, AttemptRecord, AttemptUpdate, BucketSpec,
};
use crate::errors::StorageError;

use super::LockoutStorage;

#[derive(Debug, Clone, Copy)]
struct Entry {
    record: AttemptRecord,
    expire_at_epoch: i64,
}

/// `Mutex<HashMap>` backed [`LockoutStorage`]
pub struct InMemoryLockoutStorage {
    app_id: String,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryLockoutStorage {
    pub fn new(app_id: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            app_id: app_id.into(),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Storage driven by the local wall clock
    pub fn with_system_clock(app_id: impl Into<String>) -> Self {
        Self::new(app_id, Arc::new(SystemClock))
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        let now = self.now_ms();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.expire_at_epoch > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute expiry of the record, epoch milliseconds
    pub fn expires_at(&self, spec: &BucketSpec, contributor: &str) -> Option<i64> {
        let key = spec.storage_key(&self.app_id, contributor);
        let now = self.now_ms();
        self.entries
            .lock()
            .ok()?
            .get(&key)
            .filter(|e| e.expire_at_epoch > now)
            .map(|e| e.expire_at_epoch)
    }

    /// Entries held in the map, expired ones included
    #[cfg(test)]
    pub(crate) fn stored_len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Internal {
            message: "lockout storage mutex poisoned".to_string(),
        })
    }

    /// Drop the record at `key` once its expiry has passed
    fn live_record(entries: &mut HashMap<String, Entry>, key: &str, now: i64) -> Option<AttemptRecord> {
        match entries.get(key) {
            Some(entry) if entry.expire_at_epoch > now => Some(entry.record),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl LockoutStorage for InMemoryLockoutStorage {
    async fn update(
        &self,
        spec: &BucketSpec,
        contributor: &str,
        delta: u32,
    ) -> Result<AttemptUpdate, StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        let params = spec.attempt_params();

        let mut entries = self.lock_entries()?;
        let now = self.now_ms();
        let existing = Self::live_record(&mut entries, &key, now);

        let evaluation = evaluate_attempt(existing.as_ref(), now, &params, i64::from(delta));
        if let Some(write) = evaluation.write {
            entries.retain(|_, entry| entry.expire_at_epoch > now);
            entries.insert(
                key,
                Entry {
                    record: write.record,
                    expire_at_epoch: write.expire_at_epoch,
                },
            );
        }

        Ok(AttemptUpdate {
            is_success: evaluation.is_success,
            locked_until: evaluation.locked_until_epoch.and_then(epoch_ms_to_datetime),
        })
    }

    async fn clear(&self, spec: &BucketSpec, contributor: &str) -> Result<(), StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        self.lock_entries()?.remove(&key);
        Ok(())
    }

    async fn inspect(
        &self,
        spec: &BucketSpec,
        contributor: &str,
    ) -> Result<Option<AttemptRecord>, StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        let now = self.now_ms();
        let mut entries = self.lock_entries()?;
        Ok(Self::live_record(&mut entries, &key, now))
    }
}
