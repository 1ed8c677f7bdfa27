//! Unit tests for the persisted record codec and attempt results

use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;

use crate::domain::lockout::{AttemptRecord, MakeAttemptResult};
use crate::errors::{AuthError, StorageError};

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_encode_without_lock() {
    let record = AttemptRecord {
        attempts: 2,
        locked_until_epoch: None,
    };
    assert_eq!(record.to_fields(), vec![("attempts", "2".to_string())]);
}

#[test]
fn test_decode_full_record() {
    let decoded = AttemptRecord::from_fields(
        "k",
        &fields(&[("attempts", "4"), ("locked_until_epoch", "1257894013000")]),
    )
    .unwrap()
    .unwrap();

    assert_eq!(decoded.attempts, 4);
    assert_eq!(decoded.locked_until_epoch, Some(1_257_894_013_000));
    assert_eq!(
        decoded.locked_until(),
        Some(Utc.timestamp_opt(1257894013, 0).unwrap())
    );
}

#[test]
fn test_decode_empty_hash_is_absent() {
    assert_eq!(AttemptRecord::from_fields("k", &HashMap::new()).unwrap(), None);
}

#[test]
fn test_decode_malformed_field() {
    let err = AttemptRecord::from_fields("lockout:k", &fields(&[("attempts", "three")]))
        .unwrap_err();

    match err {
        StorageError::MalformedRecord { key, reason } => {
            assert_eq!(key, "lockout:k");
            assert!(reason.contains("attempts"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_decode_negative_attempts() {
    assert!(AttemptRecord::from_fields("k", &fields(&[("attempts", "-1")])).is_err());
}

#[test]
fn test_error_if_locked() {
    let now = Utc.timestamp_opt(1257894000, 0).unwrap();
    let until = now + Duration::seconds(13);
    let result = MakeAttemptResult {
        locked_until: Some(until),
    };

    assert!(result.is_locked_at(now));
    assert_eq!(
        result.error_if_locked(now),
        Err(AuthError::AccountLockout { until })
    );

    // Unlocks exactly at the expiry instant
    assert!(!result.is_locked_at(until));
    assert_eq!(result.error_if_locked(until), Ok(()));

    assert_eq!(MakeAttemptResult::default().error_if_locked(now), Ok(()));
}

#[test]
fn test_json_layout() {
    let locked = AttemptRecord {
        attempts: 3,
        locked_until_epoch: Some(1_257_894_013_000),
    };
    assert_eq!(
        serde_json::to_value(locked).unwrap(),
        serde_json::json!({ "attempts": 3, "locked_until_epoch": 1_257_894_013_000i64 })
    );

    let open = AttemptRecord {
        attempts: 1,
        locked_until_epoch: None,
    };
    assert_eq!(
        serde_json::to_value(open).unwrap(),
        serde_json::json!({ "attempts": 1 })
    );
}
