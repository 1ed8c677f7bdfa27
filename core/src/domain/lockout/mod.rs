//! Account lockout domain: bucket policies, persisted records and the
//! attempt algorithm.

mod algorithm;
mod bucket;
mod record;

#[cfg(test)]
mod tests;

pub use algorithm::{
    evaluate_attempt, lock_duration_ms, AttemptEvaluation, AttemptParams, PendingWrite,
};
pub use bucket::{bucket_names, BucketSpec, KEY_SEPARATOR};
pub use record::{
    epoch_ms_to_datetime, AttemptRecord, AttemptUpdate, MakeAttemptResult, FIELD_ATTEMPTS,
    FIELD_LOCKED_UNTIL,
};
