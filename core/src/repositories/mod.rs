pub mod lockout;

pub use lockout::{InMemoryLockoutStorage, LockoutStorage};
