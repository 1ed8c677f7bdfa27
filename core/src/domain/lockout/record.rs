//! Persisted attempt record and per-call results

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{AuthError, StorageError};

/// Hash field holding the attempt counter
pub const FIELD_ATTEMPTS: &str = "attempts";

/// Hash field holding the lock expiry, unix epoch milliseconds
pub const FIELD_LOCKED_UNTIL: &str = "locked_until_epoch";

/// Mutable state stored per bucket key
///
/// Created by the first counted attempt, expired by the store once the
/// history window lapses, removed explicitly by a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Attempts counted since the window last reset
    pub attempts: i64,
    /// Lock expiry in epoch milliseconds, absent when never locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until_epoch: Option<i64>,
}

impl AttemptRecord {
    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until_epoch.and_then(epoch_ms_to_datetime)
    }

    /// Encode into hash fields
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![(FIELD_ATTEMPTS, self.attempts.to_string())];
        if let Some(locked_until) = self.locked_until_epoch {
            fields.push((FIELD_LOCKED_UNTIL, locked_until.to_string()));
        }
        fields
    }

    /// Decode from hash fields; an empty hash means no record
    pub fn from_fields(
        key: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Option<Self>, StorageError> {
        if fields.is_empty() {
            return Ok(None);
        }

        let attempts = match fields.get(FIELD_ATTEMPTS) {
            Some(raw) => parse_field(key, FIELD_ATTEMPTS, raw)?,
            None => 0,
        };
        let locked_until_epoch = fields
            .get(FIELD_LOCKED_UNTIL)
            .map(|raw| parse_field(key, FIELD_LOCKED_UNTIL, raw))
            .transpose()?;

        if attempts < 0 {
            return Err(StorageError::MalformedRecord {
                key: key.to_string(),
                reason: format!("negative attempt count {}", attempts),
            });
        }

        Ok(Some(Self {
            attempts,
            locked_until_epoch,
        }))
    }
}

fn parse_field(key: &str, field: &str, raw: &str) -> Result<i64, StorageError> {
    raw.parse::<i64>().map_err(|_| StorageError::MalformedRecord {
        key: key.to_string(),
        reason: format!("field '{}' is not an integer: {:?}", field, raw),
    })
}

/// Convert epoch milliseconds to a timestamp
pub fn epoch_ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Outcome of one storage update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptUpdate {
    /// False when the bucket was locked before this call
    pub is_success: bool,
    /// Current lock expiry, possibly set by this very call
    pub locked_until: Option<DateTime<Utc>>,
}

/// Result handed back to callers of `make_attempt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MakeAttemptResult {
    /// Lock expiry; may be set even though the attempt itself succeeded
    pub locked_until: Option<DateTime<Utc>>,
}

impl MakeAttemptResult {
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Turn an active lock into the typed lockout error
    pub fn error_if_locked(&self, now: DateTime<Utc>) -> Result<(), AuthError> {
        match self.locked_until {
            Some(until) if until > now => Err(AuthError::AccountLockout { until }),
            _ => Ok(()),
        }
    }
}
