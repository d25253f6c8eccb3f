//! Auth types shared across Registrar crates.
//!
//! Provides the `CallerHeaders` extractor that turns gateway-injected headers
//! into an explicit [`registrar_domain::caller::CallerContext`].

pub mod identity;
