//! Lockout request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wd_core::services::LockoutMethod;

/// Optional contributor selection, `?ip=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpQuery {
    pub ip: Option<String>,
}

impl IpQuery {
    pub fn contributor(&self) -> &str {
        self.ip.as_deref().unwrap_or("")
    }
}

/// Current state of a user's authentication bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutStatusResponse {
    pub user_id: String,
    pub bucket: String,
    pub enabled: bool,
    pub attempts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
    pub is_locked: bool,
}

/// Failed authentication to count against a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttemptRequest {
    pub method: LockoutMethod,
    /// Source IP; the peer address is used when absent
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResponse {
    /// Set when this attempt reached the threshold
    pub locked_until: Option<DateTime<Utc>>,
}
