//! Domain types shared across all Registrar crates.
//!
//! This crate contains only pure types with no framework dependencies, so every
//! layer of a service may use it.

pub mod caller;
pub mod grade;
pub mod id;
pub mod pagination;
pub mod role;
