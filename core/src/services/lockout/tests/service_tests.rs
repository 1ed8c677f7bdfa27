//! Unit tests for LockoutService

use std::sync::Arc;

use crate::domain::lockout::{AttemptUpdate, BucketSpec, MakeAttemptResult};
use crate::errors::{AuthError, DomainError, StorageError};
use crate::services::lockout::LockoutService;

use super::mocks::*;

const IP: &str = "127.0.0.1";

#[tokio::test]
async fn test_disabled_spec_skips_storage() {
    let storage = Arc::new(StubStorage::new(AttemptUpdate {
        is_success: false,
        locked_until: Some(at(100)),
    }));
    let service = LockoutService::new(storage.clone());
    let spec = BucketSpec::disabled("AccountAuthentication", vec!["user-1".to_string()]);

    for _ in 0..10 {
        let result = service.make_attempt(&spec, IP, 1).await.unwrap();
        assert_eq!(result, MakeAttemptResult::default());
    }
    assert!(service.check(&spec, IP).await.is_ok());
    assert_eq!(storage.calls(), 0);
}

#[tokio::test]
async fn test_scenarios_through_service() {
    let (clock, storage) = memory_storage();
    let service = LockoutService::new(storage);
    let spec = test_spec();

    // Scenario 1: threshold-crossing attempt succeeds and sets the lock
    for t in 1..=2 {
        clock.set(at(t));
        assert_eq!(service.make_attempt(&spec, IP, 1).await.unwrap().locked_until, None);
    }
    clock.set(at(3));
    let result = service.make_attempt(&spec, IP, 1).await.unwrap();
    assert_eq!(result.locked_until, Some(at(13)));

    // Scenario 2: attempts while locked fail with the unchanged expiry
    clock.set(at(4));
    let err = service.make_attempt(&spec, IP, 1).await.unwrap_err();
    assert!(err.is_lockout());
    match err {
        DomainError::Auth(AuthError::AccountLockout { until }) => assert_eq!(until, at(13)),
        other => panic!("unexpected error: {:?}", other),
    }

    // Scenario 3: unlocked exactly at the expiry, duration doubles
    clock.set(at(13));
    let result = service.make_attempt(&spec, IP, 1).await.unwrap();
    assert_eq!(result.locked_until, Some(at(33)));

    clock.set(at(33));
    service.make_attempt(&spec, IP, 1).await.unwrap();

    // Scenario 4: capped at the maximum duration
    clock.set(at(73));
    let result = service.make_attempt(&spec, IP, 1).await.unwrap();
    assert_eq!(result.locked_until, Some(at(123)));

    // Scenario 5: window expired
    clock.set(at(373));
    let result = service.make_attempt(&spec, IP, 1).await.unwrap();
    assert_eq!(result.locked_until, None);
}

#[tokio::test]
async fn test_clear_attempts_resets_bucket() {
    let (clock, storage) = memory_storage();
    let service = LockoutService::new(storage);
    let spec = test_spec();

    clock.set(at(1));
    service.make_attempt(&spec, IP, 3).await.unwrap();
    assert!(service.check(&spec, IP).await.is_err());

    service.clear_attempts(&spec, IP).await.unwrap();
    assert!(service.get_record(&spec, IP).await.unwrap().is_none());
    assert!(service.check(&spec, IP).await.is_ok());

    let result = service.make_attempt(&spec, IP, 1).await.unwrap();
    assert_eq!(result.locked_until, None);
    let record = service.get_record(&spec, IP).await.unwrap().unwrap();
    assert_eq!(record.attempts, 1);
}

#[tokio::test]
async fn test_check_does_not_count() {
    let (clock, storage) = memory_storage();
    let service = LockoutService::new(storage);
    let spec = test_spec();

    clock.set(at(1));
    for _ in 0..10 {
        service.check(&spec, IP).await.unwrap();
    }
    assert!(service.get_record(&spec, IP).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_reports_active_lock() {
    let (clock, storage) = memory_storage();
    let service = LockoutService::new(storage);
    let spec = test_spec();

    clock.set(at(1));
    service.make_attempt(&spec, IP, 3).await.unwrap();

    clock.set(at(5));
    let err = service.check(&spec, IP).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        AuthError::AccountLockout { until: at(11) }.to_string()
    );

    clock.set(at(11));
    assert!(service.check(&spec, IP).await.is_ok());
}

#[tokio::test]
async fn test_storage_errors_propagate_unchanged() {
    let service = LockoutService::new(Arc::new(FailingStorage::timeout()));
    let spec = test_spec();

    let err = service.make_attempt(&spec, IP, 1).await.unwrap_err();
    assert!(!err.is_lockout());
    assert!(matches!(
        err,
        DomainError::Storage(StorageError::Timeout { timeout_ms: 500 })
    ));

    assert!(matches!(
        service.check(&spec, IP).await,
        Err(DomainError::Storage(StorageError::Timeout { .. }))
    ));
    assert!(matches!(
        service.clear_attempts(&spec, IP).await,
        Err(DomainError::Storage(_))
    ));
    assert!(matches!(
        service.get_record(&spec, IP).await,
        Err(DomainError::Storage(_))
    ));
}

#[tokio::test]
async fn test_refusal_without_expiry_is_internal_fault() {
    let storage = Arc::new(StubStorage::new(AttemptUpdate {
        is_success: false,
        locked_until: None,
    }));
    let service = LockoutService::new(storage);

    let err = service.make_attempt(&test_spec(), IP, 1).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage(StorageError::Internal { .. })));
}

#[tokio::test]
async fn test_success_with_lock_is_not_an_error() {
    let storage = Arc::new(StubStorage::new(AttemptUpdate {
        is_success: true,
        locked_until: Some(at(13)),
    }));
    let service = LockoutService::new(storage.clone());

    let result = service.make_attempt(&test_spec(), IP, 1).await.unwrap();
    assert_eq!(result.locked_until, Some(at(13)));
    assert!(result.is_locked_at(at(3)));
    assert_eq!(storage.calls(), 1);
}
