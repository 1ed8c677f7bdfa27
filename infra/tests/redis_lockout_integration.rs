//! Integration tests for the Redis lockout store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p wd_infra --test redis_lockout_integration -- --ignored

use chrono::Utc;
use rand::Rng;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;

use wd_core::domain::lockout::BucketSpec;
use wd_core::errors::DomainError;
use wd_core::repositories::LockoutStorage;
use wd_core::services::LockoutService;
use wd_infra::cache::{CacheConfig, RedisClient};
use wd_infra::RedisLockoutStorage;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

async fn storage() -> (RedisClient, RedisLockoutStorage) {
    let app_id = format!("test-{}", rand::thread_rng().gen::<u32>());
    let config = CacheConfig::new(redis_url()).with_app_id(app_id);
    let client = RedisClient::new(config).await.unwrap();
    let storage = RedisLockoutStorage::new(&client);
    (client, storage)
}

fn spec(is_global: bool) -> BucketSpec {
    BucketSpec::new(
        "AccountAuthentication",
        vec![format!("user-{}", rand::thread_rng().gen::<u32>())],
        3,
        Duration::from_secs(60),
        Duration::from_secs(1),
        Duration::from_secs(2),
        2.0,
        is_global,
    )
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_health_check() {
    let (client, _) = storage().await;
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_lock_after_threshold() {
    let (_, storage) = storage().await;
    let s = spec(true);
    let before = Utc::now();

    for _ in 0..2 {
        let update = storage.update(&s, "127.0.0.1", 1).await.unwrap();
        assert!(update.is_success);
        assert!(update.locked_until.is_none());
    }

    let update = storage.update(&s, "127.0.0.1", 1).await.unwrap();
    assert!(update.is_success);
    let until = update.locked_until.unwrap();
    assert!(until > before);

    let update = storage.update(&s, "127.0.0.2", 1).await.unwrap();
    assert!(!update.is_success);
    assert_eq!(update.locked_until, Some(until));

    let record = storage.inspect(&s, "127.0.0.1").await.unwrap().unwrap();
    assert_eq!(record.attempts, 3);
    assert_eq!(record.locked_until(), Some(until));

    storage.clear(&s, "127.0.0.1").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_backoff_after_lock_expires() {
    let (_, storage) = storage().await;
    let s = spec(true);

    let first = storage.update(&s, "", 3).await.unwrap().locked_until.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let update = storage.update(&s, "", 1).await.unwrap();
    assert!(update.is_success);
    let second = update.locked_until.unwrap();
    // Doubled to 2s, the configured maximum
    assert!(second - first >= chrono::Duration::milliseconds(2000));

    storage.clear(&s, "").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_per_contributor_keys() {
    let (_, storage) = storage().await;
    let s = spec(false);

    storage.update(&s, "10.0.0.1", 3).await.unwrap();
    assert!(!storage.update(&s, "10.0.0.1", 1).await.unwrap().is_success);
    assert!(storage.update(&s, "10.0.0.2", 1).await.unwrap().is_success);

    storage.clear(&s, "10.0.0.1").await.unwrap();
    storage.clear(&s, "10.0.0.2").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_record_layout_and_expiry() {
    let (client, storage) = storage().await;
    let s = spec(true);
    let key = s.storage_key(storage.app_id(), "");

    storage.update(&s, "", 1).await.unwrap();

    let mut conn = client.connection();
    let attempts: String = conn.hget(&key, "attempts").await.unwrap();
    assert_eq!(attempts, "1");
    let ttl: i64 = conn.pttl(&key).await.unwrap();
    assert!(ttl > 0 && ttl <= 60_000);

    // A status check leaves the expiry alone
    tokio::time::sleep(Duration::from_millis(50)).await;
    storage.update(&s, "", 0).await.unwrap();
    let ttl_after: i64 = conn.pttl(&key).await.unwrap();
    assert!(ttl_after < ttl);

    storage.clear(&s, "").await.unwrap();
    assert!(storage.inspect(&s, "").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_malformed_record_is_reported() {
    let (client, storage) = storage().await;
    let s = spec(true);
    let key = s.storage_key(storage.app_id(), "");

    let mut conn = client.connection();
    let _: () = conn.hset(&key, "attempts", "many").await.unwrap();

    let err = storage.update(&s, "", 1).await.unwrap_err();
    assert!(matches!(
        err,
        wd_core::errors::StorageError::MalformedRecord { .. }
    ));

    let _: () = conn.del(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_concurrent_attempts_are_atomic() {
    let (_, storage) = storage().await;
    let storage = Arc::new(storage);
    let s = BucketSpec {
        max_attempts: 1000,
        ..spec(true)
    };

    let mut handles = Vec::new();
    for _ in 0..25 {
        let storage = storage.clone();
        let s = s.clone();
        handles.push(tokio::spawn(async move {
            storage.update(&s, "", 1).await.unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_success);
    }

    let record = storage.inspect(&s, "").await.unwrap().unwrap();
    assert_eq!(record.attempts, 25);
    storage.clear(&s, "").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_service_over_redis() {
    let (_, storage) = storage().await;
    let service = LockoutService::new(Arc::new(storage));
    let s = spec(true);

    service.make_attempt(&s, "", 3).await.unwrap();
    let err = service.make_attempt(&s, "", 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(_)));
    assert!(err.is_lockout());

    service.clear_attempts(&s, "").await.unwrap();
    assert!(service.check(&s, "").await.is_ok());
}
