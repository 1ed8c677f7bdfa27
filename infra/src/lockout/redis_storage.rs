//! Redis implementation of `LockoutStorage`

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, RedisError, Script, ToRedisArgs};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

use wd_core::domain::lockout::{
    epoch_ms_to_datetime, AttemptParams, AttemptRecord, AttemptUpdate, BucketSpec,
};
use wd_core::errors::StorageError;
use wd_core::repositories::LockoutStorage;

use super::script::{ATTEMPT_SCRIPT, MALFORMED_ERROR_CODE, NO_LOCK};
use crate::cache::RedisClient;

/// Lockout storage on a shared Redis instance
///
/// `now` always comes from Redis `TIME`, so callers on different hosts agree
/// on lock expiry. Each call is one round trip bounded by `response_timeout`
/// and is never retried.
#[derive(Clone)]
pub struct RedisLockoutStorage {
    connection: MultiplexedConnection,
    app_id: String,
    response_timeout: Duration,
    script: Script,
}

impl RedisLockoutStorage {
    /// Storage on the client's connection, namespaced by its `app_id`
    pub fn new(client: &RedisClient) -> Self {
        let config = client.config();
        Self::from_connection(
            client.connection(),
            config.app_id.clone(),
            config.response_timeout(),
        )
    }

    pub fn from_connection(
        connection: MultiplexedConnection,
        app_id: impl Into<String>,
        response_timeout: Duration,
    ) -> Self {
        Self {
            connection,
            app_id: app_id.into(),
            response_timeout,
            script: Script::new(ATTEMPT_SCRIPT),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Run one round trip under the response deadline
    async fn with_deadline<T, F>(&self, key: &str, operation: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.response_timeout, operation).await {
            Ok(result) => result.map_err(|e| {
                error!(key = key, error = %e, "Lockout store command failed");
                map_redis_error(key, e)
            }),
            Err(_) => {
                error!(
                    key = key,
                    timeout_ms = timeout_ms(self.response_timeout),
                    "Lockout store command timed out"
                );
                Err(StorageError::Timeout {
                    timeout_ms: timeout_ms(self.response_timeout),
                })
            }
        }
    }
}

#[async_trait]
impl LockoutStorage for RedisLockoutStorage {
    async fn update(
        &self,
        spec: &BucketSpec,
        contributor: &str,
        delta: u32,
    ) -> Result<AttemptUpdate, StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        let params = spec.attempt_params();
        let mut conn = self.connection.clone();

        let mut invocation = self.script.key(&key);
        for arg in script_args(&params, delta) {
            invocation.arg(arg);
        }

        let reply: (i64, i64) = self
            .with_deadline(&key, invocation.invoke_async(&mut conn))
            .await?;
        let update = decode_reply(&key, reply)?;

        debug!(
            key = %key,
            delta = delta,
            is_success = update.is_success,
            locked_until = ?update.locked_until,
            "Lockout script evaluated"
        );

        Ok(update)
    }

    async fn clear(&self, spec: &BucketSpec, contributor: &str) -> Result<(), StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        let mut conn = self.connection.clone();

        let deleted: i64 = self.with_deadline(&key, conn.del(&key)).await?;
        debug!(key = %key, deleted = deleted > 0, "Lockout record cleared");
        Ok(())
    }

    async fn inspect(
        &self,
        spec: &BucketSpec,
        contributor: &str,
    ) -> Result<Option<AttemptRecord>, StorageError> {
        let key = spec.storage_key(&self.app_id, contributor);
        let mut conn = self.connection.clone();

        let fields: HashMap<String, String> =
            self.with_deadline(&key, conn.hgetall(&key)).await?;
        AttemptRecord::from_fields(&key, &fields)
    }
}

/// ARGV of the attempt script, in order
pub(crate) fn script_args(params: &AttemptParams, delta: u32) -> Vec<Vec<u8>> {
    let mut args = Vec::with_capacity(6);
    params.history_ms.write_redis_args(&mut args);
    params.max_attempts.write_redis_args(&mut args);
    params.min_duration_ms.write_redis_args(&mut args);
    params.max_duration_ms.write_redis_args(&mut args);
    params.backoff_factor.write_redis_args(&mut args);
    delta.write_redis_args(&mut args);
    args
}

/// Decode the `{is_success, locked_until}` script reply
pub(crate) fn decode_reply(key: &str, reply: (i64, i64)) -> Result<AttemptUpdate, StorageError> {
    let (is_success, locked_until_ms) = reply;

    let is_success = match is_success {
        1 => true,
        0 => false,
        other => {
            return Err(StorageError::Script {
                message: format!("unexpected success flag {} for '{}'", other, key),
            })
        }
    };

    let locked_until = if locked_until_ms == NO_LOCK {
        None
    } else {
        Some(
            epoch_ms_to_datetime(locked_until_ms).ok_or_else(|| StorageError::MalformedRecord {
                key: key.to_string(),
                reason: format!("lock expiry {} out of range", locked_until_ms),
            })?,
        )
    };

    Ok(AttemptUpdate {
        is_success,
        locked_until,
    })
}

/// Classify a Redis failure
pub(crate) fn map_redis_error(key: &str, err: RedisError) -> StorageError {
    if err.code() == Some(MALFORMED_ERROR_CODE) {
        return StorageError::MalformedRecord {
            key: key.to_string(),
            reason: err.detail().unwrap_or("malformed field").to_string(),
        };
    }

    if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() || err.is_connection_refusal() {
        return StorageError::Connection {
            message: err.to_string(),
        };
    }

    StorageError::Script {
        message: err.to_string(),
    }
}

fn timeout_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
