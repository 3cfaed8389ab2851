//! Credential handling shared across AutoVault crates.
//!
//! Provides bearer-header parsing and signed credential verification.

pub mod bearer;
pub mod token;
