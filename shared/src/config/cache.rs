//! Redis store configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration for the lockout store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Response timeout in milliseconds for a single lockout round trip
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Application identifier used to namespace every lockout key
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Attempts made while establishing the initial connection
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connection_timeout: default_connection_timeout(),
            response_timeout_ms: default_response_timeout_ms(),
            app_id: default_app_id(),
            connect_retries: default_connect_retries(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| default_url());
        let response_timeout_ms = std::env::var("REDIS_RESPONSE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_response_timeout_ms);
        let app_id = std::env::var("APP_ID").unwrap_or_else(|_| default_app_id());

        Self {
            url,
            response_timeout_ms,
            app_id,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the application namespace for lockout keys
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Response timeout as a `Duration`
    pub fn response_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.response_timeout_ms)
    }
}

fn default_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_response_timeout_ms() -> u64 {
    500
}

fn default_app_id() -> String {
    String::from("default")
}

fn default_connect_retries() -> u32 {
    3
}
