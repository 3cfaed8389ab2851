//! Domain types shared across all AutoVault crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Safe to import from any layer.

pub mod access;
pub mod pagination;
pub mod role;
