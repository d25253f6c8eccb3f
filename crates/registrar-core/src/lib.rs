//! Service plumbing shared by Registrar binaries: config loading, tracing,
//! HTTP error bodies, health probes and sea-orm helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
