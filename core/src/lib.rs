//! # Warden Core
//!
//! Core lockout logic for the Warden backend.
//! This crate contains the bucket model and attempt algorithm, the storage
//! interface with an in-process implementation, the lockout services, and
//! the error types shared by the outer layers.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
