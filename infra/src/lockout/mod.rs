//! Redis lockout store
//!
//! Records live in a Redis hash per bucket key. Every attempt runs one Lua
//! script so the read, the decision and the write happen atomically on the
//! server, timed by the server's own clock.

mod redis_storage;
mod script;


pub use redis_storage::RedisLockoutStorage;
pub use script::{ATTEMPT_SCRIPT, MALFORMED_ERROR_CODE, NO_LOCK};
