pub mod memory;
mod r#trait;


pub use memory::InMemoryLockoutStorage;
pub use r#trait::LockoutStorage;
