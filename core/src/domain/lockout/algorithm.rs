//! Attempt counting with exponential backoff
//!
//! This is the read-decide-write step every store must execute atomically
//! per key. The Redis store runs an equivalent Lua script; the in-memory store
//! calls [`evaluate_attempt`] while holding its lock.

use super::AttemptRecord;

/// Numeric inputs, all durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptParams {
    pub history_ms: i64,
    pub max_attempts: i64,
    pub min_duration_ms: i64,
    pub max_duration_ms: i64,
    pub backoff_factor: f64,
}

/// Record to write back, with its absolute expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    pub record: AttemptRecord,
    pub expire_at_epoch: i64,
}

/// Result of evaluating one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptEvaluation {
    pub is_success: bool,
    pub locked_until_epoch: Option<i64>,
    /// `None` for status checks and blocked calls; nothing is written then
    pub write: Option<PendingWrite>,
}

/// Lock duration once `attempts` has reached the threshold
///
/// `min(min_duration * factor^(attempts - max_attempts), max_duration)`,
/// floored to whole milliseconds. A product that is not a number (zero base
/// times an overflowed power) is capped like any other oversized value.
pub fn lock_duration_ms(attempts: i64, params: &AttemptParams) -> Option<i64> {
    if attempts < params.max_attempts {
        return None;
    }

    let exponent = (attempts - params.max_attempts) as f64;
    let uncapped = params.min_duration_ms as f64 * params.backoff_factor.powf(exponent);
    let max = params.max_duration_ms as f64;
    let capped = if uncapped.is_nan() || uncapped > max {
        max
    } else {
        uncapped
    };
    Some(capped.floor() as i64)
}

/// Apply `delta` attempts at `now` (epoch milliseconds)
///
/// Success is judged on the state before the update, so the attempt that
/// crosses the threshold succeeds and only later attempts are refused. A
/// refused call never increments the counter.
pub fn evaluate_attempt(
    existing: Option<&AttemptRecord>,
    now: i64,
    params: &AttemptParams,
    delta: i64,
) -> AttemptEvaluation {
    let mut record = existing.copied().unwrap_or_default();

    let is_blocked = matches!(record.locked_until_epoch, Some(until) if until > now);
    let is_success = !is_blocked;

    if delta < 1 || is_blocked {
        return AttemptEvaluation {
            is_success,
            locked_until_epoch: record.locked_until_epoch,
            write: None,
        };
    }

    record.attempts += delta;
    if let Some(duration) = lock_duration_ms(record.attempts, params) {
        record.locked_until_epoch = Some(now.saturating_add(duration));
    }

    AttemptEvaluation {
        is_success,
        locked_until_epoch: record.locked_until_epoch,
        write: Some(PendingWrite {
            record,
            expire_at_epoch: now.saturating_add(params.history_ms),
        }),
    }
}
