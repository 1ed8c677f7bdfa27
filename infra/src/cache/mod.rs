//! Cache module for the Redis connection
//!
//! This module owns connection bootstrap: URL parsing, retried initial
//! connect and health checking. Lockout commands run on the connection it
//! hands out.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use wd_shared::CacheConfig;
