//! Server-side attempt script

/// Error code the script replies with when a stored field is not a number
pub const MALFORMED_ERROR_CODE: &str = "MALFORMED";

/// Reply value standing for "no lock"
pub const NO_LOCK: i64 = -1;

/// Attempt script
///
/// KEYS[1]: record key
/// ARGV: history_ms, max_attempts, min_duration_ms, max_duration_ms,
///       backoff_factor, delta
///
/// Replies `{is_success, locked_until_epoch_ms or -1}`.
pub const ATTEMPT_SCRIPT: &str = r#"
local key = KEYS[1]
local history_ms = tonumber(ARGV[1])
local max_attempts = tonumber(ARGV[2])
local min_duration_ms = tonumber(ARGV[3])
local max_duration_ms = tonumber(ARGV[4])
local backoff_factor = tonumber(ARGV[5])
local delta = tonumber(ARGV[6])

local time = redis.call("TIME")
local now = tonumber(time[1]) * 1000 + math.floor(tonumber(time[2]) / 1000)

local stored = redis.call("HMGET", key, "attempts", "locked_until_epoch")

local attempts = 0
if stored[1] then
  attempts = tonumber(stored[1])
  if attempts == nil or attempts < 0 then
    return redis.error_reply("MALFORMED field 'attempts' is not a valid count")
  end
end

local locked_until = nil
if stored[2] then
  locked_until = tonumber(stored[2])
  if locked_until == nil then
    return redis.error_reply("MALFORMED field 'locked_until_epoch' is not an integer")
  end
end

local is_blocked = locked_until ~= nil and locked_until > now
local is_success = 1
if is_blocked then
  is_success = 0
end

if delta < 1 or is_blocked then
  return { is_success, locked_until or -1 }
end

attempts = attempts + delta
if attempts >= max_attempts then
  local duration = min_duration_ms * (backoff_factor ^ (attempts - max_attempts))
  if duration ~= duration or duration > max_duration_ms then
    duration = max_duration_ms
  end
  locked_until = now + math.floor(duration)
end

if locked_until ~= nil then
  redis.call("HSET", key,
    "attempts", string.format("%d", attempts),
    "locked_until_epoch", string.format("%d", locked_until))
else
  redis.call("HSET", key, "attempts", string.format("%d", attempts))
end
redis.call("PEXPIREAT", key, now + history_ms)

return { is_success, locked_until or -1 }
"#;
