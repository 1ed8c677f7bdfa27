//! Route handlers

pub mod lockout;
