//! Test utilities for AutoVault crates.
//!
//! Import from `[dev-dependencies]` only, never in production code.

pub mod auth;
