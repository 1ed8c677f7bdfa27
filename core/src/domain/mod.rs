//! Domain layer: lockout policies, persisted state and time sources.

pub mod clock;
pub mod lockout;

// Re-export commonly used domain types
pub use clock::{Clock, ManualClock, SystemClock};
pub use lockout::*;
